use tracing::info;

use crate::{
    domain::{
        common::{FoodLenzConfig, entities::app_errors::CoreError},
        food_analysis::services::AnalysisClient,
        library::services::PersistenceStore,
        session::services::ViewController,
    },
    infrastructure::{llm::GeminiLLMClient, storage::FileKeyValueStore},
};

pub type FoodLenzService = AnalysisClient<GeminiLLMClient>;
pub type FoodLenzController = ViewController<FoodLenzService, FileKeyValueStore>;

pub async fn create_controller(config: FoodLenzConfig) -> Result<FoodLenzController, anyhow::Error> {
    if config.llm.gemini_api_key.trim().is_empty() {
        return Err(CoreError::InvalidConfig("GEMINI_API_KEY is not set".to_string()).into());
    }
    if config.storage.max_favorites == 0 {
        return Err(
            CoreError::InvalidConfig("max favorites must be at least 1".to_string()).into(),
        );
    }

    let llm_client = GeminiLLMClient::from(&config.llm);
    let service = AnalysisClient::new(llm_client);

    let kv = FileKeyValueStore::new(config.storage.data_dir.clone());
    let mut store = PersistenceStore::new(kv, config.storage.max_favorites);
    store.load().await;

    info!(
        model = %config.llm.gemini_model,
        data_dir = %config.storage.data_dir.display(),
        "FoodLenz controller ready"
    );

    Ok(ViewController::new(service, store))
}
