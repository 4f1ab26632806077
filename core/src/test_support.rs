use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use serde_json::json;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{ChatMessage, FoodAnalysis},
        ports::LLMClient,
        value_objects::ImagePayload,
    },
};

pub fn sample_analysis_json(food_name: &str) -> String {
    json!({
        "foodName": food_name,
        "starRating": 4.5,
        "verdict": "A solid everyday choice",
        "detailedAnalysis": "High in fiber and slow carbs.",
        "portionRecommendation": "One bowl",
        "nutritionalValues": {
            "per100g": { "calories": 250, "protein": 10, "carbs": 30, "fat": 8 },
            "perServing": { "calories": 375, "protein": 15, "carbs": 45, "fat": 12 },
            "servingSize": "1 bowl (150g)"
        },
        "ingredients": [
            {
                "name": "Oats",
                "quantity": "80g",
                "category": "Grain",
                "explanation": "Whole grain",
                "isGood": true,
                "impact": "Fiber Rich",
                "healthNote": "Keeps blood sugar steady"
            },
            {
                "name": "Honey",
                "quantity": "1 tbsp",
                "category": "Sugar",
                "explanation": "Natural sweetener",
                "isGood": null,
                "impact": "Added Sugar"
            }
        ],
        "pairingRecommendations": ["Berries", "Walnuts"],
        "recipes": [
            {
                "name": "Overnight Oats",
                "time": "5 mins",
                "calories": "300 kcal",
                "description": "Soak oats overnight"
            }
        ]
    })
    .to_string()
}

pub fn sample_analysis(food_name: &str) -> FoodAnalysis {
    serde_json::from_str(&sample_analysis_json(food_name)).expect("sample analysis is valid")
}

#[derive(Debug, Default)]
struct Script {
    responses: VecDeque<Result<String, CoreError>>,
    prompts: Vec<String>,
    images: Vec<String>,
    chats: Vec<Vec<ChatMessage>>,
    calls: usize,
}

/// LLM fake that replays queued replies and records what it was sent.
#[derive(Debug, Default)]
pub struct ScriptedLLMClient {
    script: Mutex<Script>,
}

impl ScriptedLLMClient {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().expect("script lock")
    }

    pub fn push_ok(&self, response: impl Into<String>) {
        self.script().responses.push_back(Ok(response.into()));
    }

    pub fn push_err(&self, error: CoreError) {
        self.script().responses.push_back(Err(error));
    }

    pub fn calls(&self) -> usize {
        self.script().calls
    }

    pub fn prompts(&self) -> Vec<String> {
        self.script().prompts.clone()
    }

    pub fn images(&self) -> Vec<String> {
        self.script().images.clone()
    }

    pub fn last_chat(&self) -> Vec<ChatMessage> {
        self.script().chats.last().cloned().unwrap_or_default()
    }

    fn next(&self) -> Result<String, CoreError> {
        let mut script = self.script();
        script.calls += 1;
        script
            .responses
            .pop_front()
            .unwrap_or_else(|| Err(CoreError::Transport("no scripted response".to_string())))
    }
}

impl LLMClient for ScriptedLLMClient {
    async fn generate_with_image(
        &self,
        prompt: String,
        image: ImagePayload,
        _response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        {
            let mut script = self.script();
            script.prompts.push(prompt);
            script.images.push(image.mime_type);
        }
        self.next()
    }

    async fn generate_with_text(
        &self,
        prompt: String,
        _response_schema: serde_json::Value,
    ) -> Result<String, CoreError> {
        self.script().prompts.push(prompt);
        self.next()
    }

    async fn generate_chat(&self, turns: Vec<ChatMessage>) -> Result<String, CoreError> {
        self.script().chats.push(turns);
        self.next()
    }
}
