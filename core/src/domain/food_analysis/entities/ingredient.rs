use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub explanation: String,
    #[serde(rename = "isGood")]
    pub health: HealthFlag,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_note: Option<String>,
}

/// Wire form is `true`, `false` or `null`; the key itself is mandatory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthFlag {
    Good,
    Bad,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngredientCategory {
    Vegetable,
    Fruit,
    Grain,
    Protein,
    Dairy,
    Fat,
    Sugar,
    Additive,
    Water,
    Spice,
    Beverage,
    Other,
}

impl Serialize for HealthFlag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            HealthFlag::Good => serializer.serialize_bool(true),
            HealthFlag::Bad => serializer.serialize_bool(false),
            HealthFlag::Neutral => serializer.serialize_none(),
        }
    }
}

impl<'de> Deserialize<'de> for HealthFlag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Going through Value makes a missing key an error instead of a silent null.
        match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Bool(true) => Ok(HealthFlag::Good),
            serde_json::Value::Bool(false) => Ok(HealthFlag::Bad),
            serde_json::Value::Null => Ok(HealthFlag::Neutral),
            other => Err(serde::de::Error::custom(format!(
                "isGood must be true, false or null, got {}",
                other
            ))),
        }
    }
}

impl From<&str> for IngredientCategory {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "vegetable" => IngredientCategory::Vegetable,
            "fruit" => IngredientCategory::Fruit,
            "grain" => IngredientCategory::Grain,
            "protein" => IngredientCategory::Protein,
            "dairy" => IngredientCategory::Dairy,
            "fat" => IngredientCategory::Fat,
            "sugar" => IngredientCategory::Sugar,
            "additive" => IngredientCategory::Additive,
            "water" => IngredientCategory::Water,
            "spice" => IngredientCategory::Spice,
            "beverage" => IngredientCategory::Beverage,
            _ => IngredientCategory::Other,
        }
    }
}

impl IngredientCategory {
    pub fn label(&self) -> &'static str {
        match self {
            IngredientCategory::Vegetable => "Vegetable",
            IngredientCategory::Fruit => "Fruit",
            IngredientCategory::Grain => "Grain",
            IngredientCategory::Protein => "Protein",
            IngredientCategory::Dairy => "Dairy",
            IngredientCategory::Fat => "Fat",
            IngredientCategory::Sugar => "Sugar",
            IngredientCategory::Additive => "Additive",
            IngredientCategory::Water => "Water",
            IngredientCategory::Spice => "Spice",
            IngredientCategory::Beverage => "Beverage",
            IngredientCategory::Other => "Other",
        }
    }
}

impl Ingredient {
    pub fn category_kind(&self) -> IngredientCategory {
        self.category
            .as_deref()
            .map(IngredientCategory::from)
            .unwrap_or(IngredientCategory::Other)
    }

    pub fn with_quantity(&self, quantity: impl Into<String>) -> Self {
        Self {
            quantity: Some(quantity.into()),
            ..self.clone()
        }
    }
}
