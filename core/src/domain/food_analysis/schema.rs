use serde_json::json;

/// Top-level keys every analysis response must carry.
pub const REQUIRED_ANALYSIS_KEYS: [&str; 8] = [
    "foodName",
    "starRating",
    "verdict",
    "detailedAnalysis",
    "portionRecommendation",
    "ingredients",
    "pairingRecommendations",
    "recipes",
];

fn nutritional_values_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "calories": { "type": "number" },
            "protein": { "type": "number" },
            "carbs": { "type": "number" },
            "fat": { "type": "number" }
        },
        "required": ["calories", "protein", "carbs", "fat"]
    })
}

/// Returns the JSON schema for food analysis LLM responses
pub fn get_food_analysis_schema() -> serde_json::Value {
    json!({
        "type": "object",
        "properties": {
            "foodName": { "type": "string" },
            "starRating": { "type": "number" },
            "verdict": { "type": "string" },
            "detailedAnalysis": { "type": "string" },
            "portionRecommendation": { "type": "string" },
            "nutritionalValues": {
                "type": "object",
                "properties": {
                    "per100g": nutritional_values_schema(),
                    "perServing": nutritional_values_schema(),
                    "servingSize": { "type": "string" }
                },
                "required": ["per100g", "perServing", "servingSize"]
            },
            "ingredients": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "quantity": { "type": "string" },
                        "category": {
                            "type": "string",
                            "enum": [
                                "Vegetable", "Fruit", "Grain", "Protein", "Dairy", "Fat",
                                "Sugar", "Additive", "Water", "Spice", "Beverage", "Other"
                            ]
                        },
                        "explanation": { "type": "string" },
                        "isGood": { "type": "boolean", "nullable": true },
                        "impact": { "type": "string" },
                        "healthNote": { "type": "string" }
                    },
                    "required": ["name", "explanation", "isGood"]
                }
            },
            "pairingRecommendations": {
                "type": "array",
                "items": { "type": "string" }
            },
            "recipes": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "time": { "type": "string" },
                        "calories": { "type": "string" },
                        "description": { "type": "string" },
                        "url": { "type": "string" }
                    },
                    "required": ["name", "time", "calories", "description"]
                }
            }
        },
        "required": REQUIRED_ANALYSIS_KEYS
    })
}
