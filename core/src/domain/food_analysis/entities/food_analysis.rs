use serde::{Deserialize, Serialize};

use super::{ingredient::Ingredient, nutrition::NutritionBreakdown};

const RECIPE_SEARCH_URL: &str = "https://www.google.com/search?q=";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FoodAnalysis {
    pub food_name: String,
    pub star_rating: f64,
    pub verdict: String,
    pub detailed_analysis: String,
    pub portion_recommendation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_values: Option<NutritionBreakdown>,
    pub ingredients: Vec<Ingredient>,
    pub pairing_recommendations: Vec<String>,
    pub recipes: Vec<Recipe>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recipe {
    pub name: String,
    pub time: String,
    pub calories: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FoodAnalysis {
    /// Whole stars to light up when rendering the rating.
    pub fn rounded_stars(&self) -> u8 {
        self.star_rating.clamp(0.0, 5.0).round() as u8
    }

    pub fn share_text(&self) -> String {
        format!(
            "Check out this analysis for {} on FoodLenz!\nRating: {}/5\nVerdict: {}",
            self.food_name, self.star_rating, self.verdict
        )
    }
}

impl Recipe {
    /// Link provided by the model, or a web search for the recipe name.
    pub fn link(&self) -> String {
        match self.url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}{}", RECIPE_SEARCH_URL, urlencoding::encode(&self.name)),
        }
    }

    pub fn share_text(&self) -> String {
        format!(
            "Recipe: {}\nCheck out this healthy recipe for {} recommended by FoodLenz!\n\n{}\n\nCalories: {}\nPrep time: {}\n{}",
            self.name,
            self.name,
            self.description,
            self.calories,
            self.time,
            self.link()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipe(url: Option<&str>) -> Recipe {
        Recipe {
            name: "Greek Yogurt Bowl".to_string(),
            time: "5 mins".to_string(),
            calories: "220 kcal".to_string(),
            description: "Top yogurt with berries".to_string(),
            url: url.map(str::to_string),
        }
    }

    #[test]
    fn test_recipe_link_prefers_model_url() {
        assert_eq!(
            recipe(Some("https://example.com/bowl")).link(),
            "https://example.com/bowl"
        );
    }

    #[test]
    fn test_recipe_link_falls_back_to_search() {
        assert_eq!(
            recipe(None).link(),
            "https://www.google.com/search?q=Greek%20Yogurt%20Bowl"
        );
        assert_eq!(
            recipe(Some("  ")).link(),
            "https://www.google.com/search?q=Greek%20Yogurt%20Bowl"
        );
    }

    #[test]
    fn test_recipe_share_text_contains_link() {
        let text = recipe(None).share_text();
        assert!(text.starts_with("Recipe: Greek Yogurt Bowl"));
        assert!(text.contains("Calories: 220 kcal"));
        assert!(text.ends_with("q=Greek%20Yogurt%20Bowl"));
    }
}
