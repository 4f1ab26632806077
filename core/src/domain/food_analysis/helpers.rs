use std::sync::LazyLock;

use regex::Regex;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{entities::FoodAnalysis, schema::REQUIRED_ANALYSIS_KEYS},
};

static OPENING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^```[A-Za-z0-9_+-]*[ \t]*\r?\n?").expect("valid regex"));

static CLOSING_FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n?```$").expect("valid regex"));

/// Remove markdown code fences, with or without a language tag.
///
/// The opening and closing markers are stripped independently, so a reply
/// carrying only one of them still decodes.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let body = match OPENING_FENCE.find(trimmed) {
        Some(m) => &trimmed[m.end()..],
        None => trimmed,
    };
    let body = match CLOSING_FENCE.find(body) {
        Some(m) => &body[..m.start()],
        None => body,
    };
    body.trim()
}

/// Decode the model's free text into a validated [`FoodAnalysis`].
///
/// Every failure is a [`CoreError::ResponseFormat`]; there is no partial result.
pub fn decode_food_analysis(raw: &str) -> Result<FoodAnalysis, CoreError> {
    let body = strip_code_fence(raw);

    let parsed: serde_json::Value = serde_json::from_str(body).map_err(|e| {
        tracing::error!("Failed to parse LLM response: {}", e);
        CoreError::ResponseFormat(format!("Failed to parse LLM response: {}", e))
    })?;

    let object = parsed.as_object().ok_or_else(|| {
        CoreError::ResponseFormat("LLM response is not a JSON object".to_string())
    })?;

    if let Some(missing) = REQUIRED_ANALYSIS_KEYS
        .iter()
        .find(|key| !object.contains_key(**key))
    {
        tracing::error!("LLM response is missing field {}", missing);
        return Err(CoreError::ResponseFormat(format!(
            "No {} field in response",
            missing
        )));
    }

    let analysis: FoodAnalysis = serde_json::from_value(parsed).map_err(|e| {
        tracing::error!("Invalid analysis format: {}", e);
        CoreError::ResponseFormat(format!("Invalid analysis format: {}", e))
    })?;

    validate_food_analysis(&analysis)?;

    Ok(analysis)
}

fn validate_food_analysis(analysis: &FoodAnalysis) -> Result<(), CoreError> {
    if analysis.food_name.trim().is_empty() {
        return Err(CoreError::ResponseFormat("foodName is empty".to_string()));
    }

    if !analysis.star_rating.is_finite() || !(0.0..=5.0).contains(&analysis.star_rating) {
        return Err(CoreError::ResponseFormat(format!(
            "starRating {} is outside 0-5",
            analysis.star_rating
        )));
    }

    if analysis
        .nutritional_values
        .as_ref()
        .is_some_and(|nutrition| !nutrition.is_valid())
    {
        return Err(CoreError::ResponseFormat(
            "nutritionalValues must be non-negative numbers".to_string(),
        ));
    }

    if let Some(position) = analysis
        .ingredients
        .iter()
        .position(|i| i.name.trim().is_empty())
    {
        return Err(CoreError::ResponseFormat(format!(
            "ingredient {} has no name",
            position
        )));
    }

    Ok(())
}
