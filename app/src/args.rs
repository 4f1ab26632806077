use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser};
use foodlenz_core::domain::{
    common::{
        DEFAULT_GEMINI_BASE_URL, DEFAULT_GEMINI_MODEL, DEFAULT_MAX_FAVORITES, FoodLenzConfig,
        LLMConfig, StorageConfig,
    },
    food_analysis::entities::Profile,
};

#[derive(Debug, Clone, Parser)]
#[command(name = "foodlenz", version, about = "Rate any food for your health profile")]
pub struct Args {
    #[command(flatten)]
    pub gemini: GeminiArgs,

    #[command(flatten)]
    pub storage: StorageArgs,

    #[command(flatten)]
    pub log: LogArgs,

    /// Profile the session starts with
    #[arg(long, env = "FOODLENZ_PROFILE", default_value = "general")]
    pub profile: Profile,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct GeminiArgs {
    #[arg(long = "gemini-api-key", env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: String,

    #[arg(long = "gemini-model", env = "GEMINI_MODEL", default_value = DEFAULT_GEMINI_MODEL)]
    pub model: String,

    #[arg(long = "gemini-base-url", env = "GEMINI_BASE_URL", default_value = DEFAULT_GEMINI_BASE_URL)]
    pub base_url: String,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct StorageArgs {
    /// Directory holding history and favorites
    #[arg(long = "data-dir", env = "FOODLENZ_DATA_DIR", default_value = ".foodlenz")]
    pub data_dir: PathBuf,

    #[arg(long = "max-favorites", env = "FOODLENZ_MAX_FAVORITES", default_value_t = DEFAULT_MAX_FAVORITES)]
    pub max_favorites: usize,
}

#[derive(Debug, Clone, ClapArgs)]
pub struct LogArgs {
    /// Used when RUST_LOG is not set
    #[arg(long = "log-filter", env = "LOG_FILTER", default_value = "warn")]
    pub filter: String,

    #[arg(long = "log-json", env = "LOG_JSON", default_value_t = false)]
    pub json: bool,
}

impl From<Args> for FoodLenzConfig {
    fn from(args: Args) -> Self {
        Self {
            llm: LLMConfig {
                gemini_api_key: args.gemini.api_key,
                gemini_model: args.gemini.model,
                gemini_base_url: args.gemini.base_url,
            },
            storage: StorageConfig {
                data_dir: args.storage.data_dir,
                max_favorites: args.storage.max_favorites,
            },
        }
    }
}
