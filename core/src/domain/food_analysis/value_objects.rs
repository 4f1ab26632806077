use base64::{Engine as _, engine::general_purpose};
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::domain::food_analysis::entities::Ingredient;

pub const DEFAULT_IMAGE_MIME: &str = "image/jpeg";

/// Raw photo handed to the analysis client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePayload {
    pub data: Bytes,
    pub mime_type: String,
}

impl ImagePayload {
    pub fn new(data: impl Into<Bytes>, mime_type: impl Into<String>) -> Self {
        Self {
            data: data.into(),
            mime_type: mime_type.into(),
        }
    }

    pub fn jpeg(data: impl Into<Bytes>) -> Self {
        Self::new(data, DEFAULT_IMAGE_MIME)
    }

    /// Guess the MIME type from a file name, defaulting to JPEG.
    pub fn with_file_name(data: impl Into<Bytes>, file_name: &str) -> Self {
        let extension = file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_lowercase())
            .unwrap_or_default();

        let mime_type = match extension.as_str() {
            "png" => "image/png",
            "webp" => "image/webp",
            "heic" => "image/heic",
            "heif" => "image/heif",
            "gif" => "image/gif",
            _ => DEFAULT_IMAGE_MIME,
        };

        Self::new(data, mime_type)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.data)
    }
}

/// Name/quantity pair the user edited before asking for a recalculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngredientOverride {
    pub name: String,
    pub quantity: Option<String>,
}

impl From<&Ingredient> for IngredientOverride {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            quantity: ingredient.quantity.clone(),
        }
    }
}
