use tracing::instrument;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{ChatMessage, FoodAnalysis, Preferences, Profile},
        helpers::decode_food_analysis,
        ports::{FoodAnalysisService, LLMClient},
        prompts::{
            chat_acknowledgement, chat_system_prompt, image_prompt, query_prompt,
            recalculate_prompt,
        },
        schema::get_food_analysis_schema,
        value_objects::{ImagePayload, IngredientOverride},
    },
};

pub const CHAT_APOLOGY: &str = "Sorry, I'm having trouble connecting right now.";

/// Talks to the model and turns its replies into typed analyses.
#[derive(Debug, Clone)]
pub struct AnalysisClient<LLM> {
    llm_client: LLM,
}

impl<LLM> AnalysisClient<LLM>
where
    LLM: LLMClient,
{
    pub fn new(llm_client: LLM) -> Self {
        Self { llm_client }
    }

    pub fn llm_client(&self) -> &LLM {
        &self.llm_client
    }
}

impl<LLM> FoodAnalysisService for AnalysisClient<LLM>
where
    LLM: LLMClient,
{
    #[instrument(skip(self, image, preferences), fields(mime_type = %image.mime_type, bytes = image.data.len()))]
    async fn analyze_from_image(
        &self,
        image: ImagePayload,
        profile: Profile,
        preferences: Preferences,
    ) -> Result<FoodAnalysis, CoreError> {
        if image.is_empty() {
            return Err(CoreError::EmptyInput);
        }

        let prompt = image_prompt(profile, &preferences);
        let raw_response = self
            .llm_client
            .generate_with_image(prompt, image, get_food_analysis_schema())
            .await?;

        decode_food_analysis(&raw_response)
    }

    #[instrument(skip(self, preferences))]
    async fn analyze_from_query(
        &self,
        query: String,
        profile: Profile,
        preferences: Preferences,
    ) -> Result<FoodAnalysis, CoreError> {
        if query.trim().is_empty() {
            return Err(CoreError::EmptyInput);
        }

        let prompt = query_prompt(&query, profile, &preferences);
        let raw_response = self
            .llm_client
            .generate_with_text(prompt, get_food_analysis_schema())
            .await?;

        decode_food_analysis(&raw_response)
    }

    #[instrument(skip_all, fields(food_name = %prior.food_name, overrides = ingredient_overrides.is_some()))]
    async fn recalculate(
        &self,
        prior: FoodAnalysis,
        profile: Profile,
        preferences: Preferences,
        ingredient_overrides: Option<Vec<IngredientOverride>>,
    ) -> Result<FoodAnalysis, CoreError> {
        let prompt = recalculate_prompt(
            &prior,
            profile,
            &preferences,
            ingredient_overrides.as_deref(),
        );
        let raw_response = self
            .llm_client
            .generate_with_text(prompt, get_food_analysis_schema())
            .await?;

        decode_food_analysis(&raw_response)
    }

    #[instrument(skip_all, fields(food_name = %context.food_name, turns = prior_turns.len()))]
    async fn chat(
        &self,
        message: String,
        context: FoodAnalysis,
        profile: Profile,
        preferences: Preferences,
        prior_turns: Vec<ChatMessage>,
    ) -> String {
        let mut turns = Vec::with_capacity(prior_turns.len() + 3);
        turns.push(ChatMessage::user(chat_system_prompt(
            &context,
            profile,
            &preferences,
        )));
        turns.push(ChatMessage::model(chat_acknowledgement(&context, profile)));
        turns.extend(prior_turns);
        turns.push(ChatMessage::user(message));

        match self.llm_client.generate_chat(turns).await {
            Ok(reply) if !reply.trim().is_empty() => reply,
            Ok(_) => {
                tracing::warn!("Chat reply was empty");
                CHAT_APOLOGY.to_string()
            }
            Err(e) => {
                tracing::error!("Chat request failed: {}", e);
                CHAT_APOLOGY.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::food_analysis::entities::ChatRole;
    use crate::test_support::{ScriptedLLMClient, sample_analysis, sample_analysis_json};

    #[tokio::test]
    async fn test_analyze_from_query_decodes_fenced_reply() {
        let llm = ScriptedLLMClient::new();
        llm.push_ok(format!("```json\n{}\n```", sample_analysis_json("Ramen")));
        let client = AnalysisClient::new(llm);

        let analysis = client
            .analyze_from_query("ramen".into(), Profile::General, Preferences::default())
            .await
            .unwrap();

        assert_eq!(analysis.food_name, "Ramen");
        assert_eq!(client.llm_client().calls(), 1);
        assert!(client.llm_client().prompts()[0].contains("\"ramen\""));
    }

    #[tokio::test]
    async fn test_empty_query_makes_no_call() {
        let client = AnalysisClient::new(ScriptedLLMClient::new());

        let err = client
            .analyze_from_query("   ".into(), Profile::General, Preferences::default())
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::EmptyInput);
        assert_eq!(client.llm_client().calls(), 0);
    }

    #[tokio::test]
    async fn test_empty_image_makes_no_call() {
        let client = AnalysisClient::new(ScriptedLLMClient::new());

        let err = client
            .analyze_from_image(
                ImagePayload::jpeg(Vec::new()),
                Profile::General,
                Preferences::default(),
            )
            .await
            .unwrap_err();

        assert_eq!(err, CoreError::EmptyInput);
        assert_eq!(client.llm_client().calls(), 0);
    }

    #[tokio::test]
    async fn test_analyze_from_image_sends_image() {
        let llm = ScriptedLLMClient::new();
        llm.push_ok(sample_analysis_json("Salad"));
        let client = AnalysisClient::new(llm);

        let analysis = client
            .analyze_from_image(
                ImagePayload::jpeg(b"jpeg-bytes".to_vec()),
                Profile::Vegan,
                Preferences::default(),
            )
            .await
            .unwrap();

        assert_eq!(analysis.food_name, "Salad");
        assert_eq!(client.llm_client().images(), vec!["image/jpeg".to_string()]);
    }

    #[tokio::test]
    async fn test_transport_and_format_errors_propagate() {
        let llm = ScriptedLLMClient::new();
        llm.push_err(CoreError::Transport("quota exceeded".into()));
        llm.push_ok("not json at all");
        let client = AnalysisClient::new(llm);

        let first = client
            .analyze_from_query("apple".into(), Profile::General, Preferences::default())
            .await
            .unwrap_err();
        let second = client
            .analyze_from_query("apple".into(), Profile::General, Preferences::default())
            .await
            .unwrap_err();

        assert!(matches!(first, CoreError::Transport(_)));
        assert!(matches!(second, CoreError::ResponseFormat(_)));
    }

    #[tokio::test]
    async fn test_recalculate_sends_overrides() {
        let llm = ScriptedLLMClient::new();
        llm.push_ok(sample_analysis_json("Oatmeal"));
        let client = AnalysisClient::new(llm);
        let prior = sample_analysis("Oatmeal");
        let overrides = prior
            .ingredients
            .iter()
            .map(|i| IngredientOverride::from(&i.with_quantity("300g")))
            .collect();

        client
            .recalculate(
                prior,
                Profile::Athlete,
                Preferences::default(),
                Some(overrides),
            )
            .await
            .unwrap();

        let prompt = &client.llm_client().prompts()[0];
        assert!(prompt.contains(r#"{"name":"Oats","quantity":"300g"}"#));
    }

    #[tokio::test]
    async fn test_chat_resends_context_and_turns() {
        let llm = ScriptedLLMClient::new();
        llm.push_ok("Yes, it is high in fiber.");
        let client = AnalysisClient::new(llm);
        let prior_turns = vec![
            ChatMessage::user("Is it sweet?"),
            ChatMessage::model("Slightly."),
        ];

        let reply = client
            .chat(
                "Is it filling?".into(),
                sample_analysis("Oatmeal"),
                Profile::General,
                Preferences::default(),
                prior_turns,
            )
            .await;

        assert_eq!(reply, "Yes, it is high in fiber.");
        let turns = client.llm_client().last_chat();
        assert_eq!(turns.len(), 5);
        assert_eq!(turns[0].role, ChatRole::User);
        assert!(turns[0].text.contains("\"foodName\":\"Oatmeal\""));
        assert_eq!(turns[1].role, ChatRole::Model);
        assert_eq!(turns[4], ChatMessage::user("Is it filling?"));
    }

    #[tokio::test]
    async fn test_chat_failure_degrades_to_apology() {
        let llm = ScriptedLLMClient::new();
        llm.push_err(CoreError::Transport("offline".into()));
        llm.push_ok("   ");
        let client = AnalysisClient::new(llm);

        for _ in 0..2 {
            let reply = client
                .chat(
                    "hello".into(),
                    sample_analysis("Oatmeal"),
                    Profile::General,
                    Preferences::default(),
                    Vec::new(),
                )
                .await;
            assert_eq!(reply, CHAT_APOLOGY);
        }
    }
}
