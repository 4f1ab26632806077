use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{ChatMessage, FoodAnalysis, Preferences, Profile},
        value_objects::{ImagePayload, IngredientOverride},
    },
};

/// LLM Client trait for calling AI models
#[cfg_attr(test, mockall::automock)]
pub trait LLMClient: Send + Sync {
    fn generate_with_image(
        &self,
        prompt: String,
        image: ImagePayload,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    fn generate_with_text(
        &self,
        prompt: String,
        response_schema: serde_json::Value,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;

    /// Multi-turn conversation; the whole transcript is sent on every call.
    fn generate_chat(
        &self,
        turns: Vec<ChatMessage>,
    ) -> impl Future<Output = Result<String, CoreError>> + Send;
}

/// Service trait for food analysis business logic
#[cfg_attr(test, mockall::automock)]
pub trait FoodAnalysisService: Send + Sync {
    fn analyze_from_image(
        &self,
        image: ImagePayload,
        profile: Profile,
        preferences: Preferences,
    ) -> impl Future<Output = Result<FoodAnalysis, CoreError>> + Send;

    fn analyze_from_query(
        &self,
        query: String,
        profile: Profile,
        preferences: Preferences,
    ) -> impl Future<Output = Result<FoodAnalysis, CoreError>> + Send;

    fn recalculate(
        &self,
        prior: FoodAnalysis,
        profile: Profile,
        preferences: Preferences,
        ingredient_overrides: Option<Vec<IngredientOverride>>,
    ) -> impl Future<Output = Result<FoodAnalysis, CoreError>> + Send;

    /// Never fails: errors degrade to an apology reply.
    fn chat(
        &self,
        message: String,
        context: FoodAnalysis,
        profile: Profile,
        preferences: Preferences,
        prior_turns: Vec<ChatMessage>,
    ) -> impl Future<Output = String> + Send;
}
