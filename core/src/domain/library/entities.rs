use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{
    common::generate_timestamp,
    food_analysis::entities::{FoodAnalysis, Profile},
};

/// Number of characters of the base64 image kept alongside a favorite.
pub const IMAGE_PREVIEW_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub analysis: FoodAnalysis,
    pub profile_snapshot: Profile,
    /// Base64 photo; only ever present in memory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl HistoryEntry {
    pub fn new(analysis: FoodAnalysis, profile_snapshot: Profile, image: Option<String>) -> Self {
        let (now, timestamp) = generate_timestamp();

        Self {
            id: Uuid::new_v7(timestamp),
            created_at: now,
            analysis,
            profile_snapshot,
            image,
        }
    }

    pub fn without_image(&self) -> Self {
        Self {
            image: None,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Favorite {
    pub analysis: FoodAnalysis,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_preview: Option<String>,
    pub saved_at: DateTime<Utc>,
}

impl Favorite {
    pub fn new(analysis: FoodAnalysis, image: Option<&str>) -> Self {
        Self {
            analysis,
            image_preview: image.map(truncate_image_preview),
            saved_at: Utc::now(),
        }
    }

    pub fn name(&self) -> &str {
        &self.analysis.food_name
    }
}

pub fn truncate_image_preview(image: &str) -> String {
    let preview: String = image.chars().take(IMAGE_PREVIEW_CHARS).collect();
    format!("{}...", preview)
}

/// Versioned envelope written under each storage key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredCollection<T> {
    pub version: u32,
    pub items: Vec<T>,
}
