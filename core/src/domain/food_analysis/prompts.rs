use crate::domain::food_analysis::{
    entities::{FoodAnalysis, Preferences, Profile},
    value_objects::IngredientOverride,
};

const PROFILE_CONTEXT_TEMPLATE: &str = "User profile: {profile}.
Allergies or restrictions: {allergies}.
Nutritional goals: {goals}.";

const RESPONSE_SHAPE: &str = r#"Respond with a single JSON object and nothing else:
{
  "foodName": string,
  "starRating": number between 0 and 5,
  "verdict": short headline,
  "detailedAnalysis": 2-3 sentences tied to the profile,
  "portionRecommendation": string,
  "nutritionalValues": {
    "per100g": { "calories": number, "protein": number, "carbs": number, "fat": number },
    "perServing": { "calories": number, "protein": number, "carbs": number, "fat": number },
    "servingSize": string
  },
  "ingredients": [{
    "name": string,
    "quantity": estimated amount such as "100g" or "1 cup",
    "category": one of Vegetable, Fruit, Grain, Protein, Dairy, Fat, Sugar, Additive, Water, Spice, Beverage, Other,
    "explanation": string,
    "isGood": true, false or null,
    "impact": short tag such as "High Sugar",
    "healthNote": how it affects this profile
  }],
  "pairingRecommendations": [string],
  "recipes": [{ "name": string, "time": string, "calories": string, "description": string, "url": web search link for the recipe }]
}"#;

const SHARED_INSTRUCTIONS: &str = "Rate it from 0 to 5 stars for this specific profile and goals.
Suggest 3 healthy recipes that respect the nutritional goals strictly.
Break down the key ingredients and their impact on this profile.
Estimate ingredient quantities and nutritional values per 100g and per typical serving.";

const IMAGE_TEMPLATE: &str = "Analyze the food in this photo.
{context}

Identify the food and its ingredients.
{instructions}

{shape}";

const QUERY_TEMPLATE: &str = "I am looking up: \"{query}\".
{context}

Produce a nutritional analysis for this item.
{instructions}

{shape}";

const RECALCULATE_TEMPLATE: &str = "There is a previous analysis for \"{food_name}\".
The profile, the goals or the ingredient quantities may have changed.
{context}

{ingredients}

Re-evaluate the star rating, verdict, detailed analysis and portion recommendation.
Update each ingredient's category, impact and health note for the new situation.
Update the recipes so they follow the current nutritional goals.
Recompute nutritional values from the quantities above when they were given.

{shape}";

const CHAT_SYSTEM_TEMPLATE: &str = "System context: you are FoodLenz, a nutrition assistant.
{context}
Current food: {analysis}

Answer questions about ingredients, nutrition, preparation and pairings. Be concise.";

fn profile_context(profile: Profile, preferences: &Preferences) -> String {
    PROFILE_CONTEXT_TEMPLATE
        .replace("{profile}", profile.label())
        .replace("{allergies}", preferences.allergies_or_default())
        .replace("{goals}", preferences.goals_or_default())
}

pub fn image_prompt(profile: Profile, preferences: &Preferences) -> String {
    IMAGE_TEMPLATE
        .replace("{context}", &profile_context(profile, preferences))
        .replace("{instructions}", SHARED_INSTRUCTIONS)
        .replace("{shape}", RESPONSE_SHAPE)
}

pub fn query_prompt(query: &str, profile: Profile, preferences: &Preferences) -> String {
    // The query goes in last so user text cannot collide with the other placeholders.
    QUERY_TEMPLATE
        .replace("{context}", &profile_context(profile, preferences))
        .replace("{instructions}", SHARED_INSTRUCTIONS)
        .replace("{shape}", RESPONSE_SHAPE)
        .replace("{query}", query.trim())
}

pub fn recalculate_prompt(
    prior: &FoodAnalysis,
    profile: Profile,
    preferences: &Preferences,
    overrides: Option<&[IngredientOverride]>,
) -> String {
    let ingredients = match overrides {
        Some(overrides) => format!(
            "The user edited the ingredient quantities. Recalculate everything for these quantities:\n{}\nAdjust each ingredient's impact and health note to its new amount.",
            serde_json::to_string(overrides).unwrap_or_default()
        ),
        None => format!(
            "Previous ingredients: {}",
            serde_json::to_string(
                &prior
                    .ingredients
                    .iter()
                    .map(|i| i.name.as_str())
                    .collect::<Vec<_>>()
            )
            .unwrap_or_default()
        ),
    };

    RECALCULATE_TEMPLATE
        .replace("{context}", &profile_context(profile, preferences))
        .replace("{shape}", RESPONSE_SHAPE)
        .replace("{ingredients}", &ingredients)
        .replace("{food_name}", &prior.food_name)
}

pub fn chat_system_prompt(
    context: &FoodAnalysis,
    profile: Profile,
    preferences: &Preferences,
) -> String {
    CHAT_SYSTEM_TEMPLATE
        .replace("{context}", &profile_context(profile, preferences))
        .replace("{analysis}", &serde_json::to_string(context).unwrap_or_default())
}

pub fn chat_acknowledgement(context: &FoodAnalysis, profile: Profile) -> String {
    format!(
        "Understood. I will answer for the {} profile about {}.",
        profile.label(),
        context.food_name
    )
}
