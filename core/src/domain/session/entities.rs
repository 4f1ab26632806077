use std::fmt;
use std::str::FromStr;

use crate::domain::{
    common::entities::app_errors::CoreError,
    food_analysis::{
        entities::{ChatMessage, FoodAnalysis, Ingredient, NutritionalValues, Preferences, Profile},
        value_objects::IngredientOverride,
    },
};

pub const DEFAULT_CUSTOM_GRAMS: &str = "100";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Tab {
    #[default]
    Home,
    History,
    Favorites,
    Profile,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Screen {
    #[default]
    Main,
    Analyzing,
    Result,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NutritionUnit {
    #[default]
    PerServing,
    Per100g,
    Custom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Analysis,
    Recalculation,
    Chat,
}

/// Identifies one outstanding request. It stays valid until the user navigates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestTicket {
    pub kind: RequestKind,
    pub screen: Screen,
    pub generation: u64,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Home, Tab::History, Tab::Favorites, Tab::Profile];

    pub fn as_str(&self) -> &'static str {
        match self {
            Tab::Home => "home",
            Tab::History => "history",
            Tab::Favorites => "favorites",
            Tab::Profile => "profile",
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Tab::ALL
            .into_iter()
            .find(|tab| tab.as_str() == wanted || (wanted == "saved" && *tab == Tab::Favorites))
            .ok_or_else(|| format!("unknown tab '{}'", s.trim()))
    }
}

impl FromStr for NutritionUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "serving" => Ok(NutritionUnit::PerServing),
            "100g" => Ok(NutritionUnit::Per100g),
            "custom" => Ok(NutritionUnit::Custom),
            other => Err(format!("unknown unit '{}'", other)),
        }
    }
}

/// Everything the result screen shows and lets the user edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub analysis: FoodAnalysis,
    pub image: Option<String>,
    /// Editable copy of the ingredient list; diverges from `analysis` until recalculated.
    pub ingredients: Vec<Ingredient>,
    pub has_unsaved_changes: bool,
    pub chat: Vec<ChatMessage>,
    pub nutrition_unit: NutritionUnit,
    pub custom_grams: String,
    pub is_favorite: bool,
}

impl ResultView {
    pub fn new(analysis: FoodAnalysis, image: Option<String>, is_favorite: bool) -> Self {
        Self {
            ingredients: analysis.ingredients.clone(),
            analysis,
            image,
            has_unsaved_changes: false,
            chat: Vec::new(),
            nutrition_unit: NutritionUnit::default(),
            custom_grams: DEFAULT_CUSTOM_GRAMS.to_string(),
            is_favorite,
        }
    }

    pub fn edit_quantity(&mut self, index: usize, quantity: &str) -> Result<(), CoreError> {
        let ingredient = self
            .ingredients
            .get_mut(index)
            .ok_or(CoreError::InvalidIngredientIndex(index))?;

        ingredient.quantity = Some(quantity.trim().to_string());
        self.has_unsaved_changes = true;

        Ok(())
    }

    pub fn ingredient_overrides(&self) -> Vec<IngredientOverride> {
        self.ingredients.iter().map(IngredientOverride::from).collect()
    }

    /// Swap in a regenerated analysis; the draft is reset to its ingredients.
    pub fn apply_recalculated(&mut self, analysis: FoodAnalysis) {
        self.ingredients = analysis.ingredients.clone();
        self.analysis = analysis;
        self.has_unsaved_changes = false;
    }

    pub fn set_nutrition_unit(&mut self, unit: NutritionUnit, custom_grams: Option<&str>) {
        self.nutrition_unit = unit;
        if let Some(grams) = custom_grams {
            self.custom_grams = grams.trim().to_string();
        }
    }

    /// Values for the selected unit; custom values are derived on every call.
    pub fn current_nutrition(&self) -> Option<NutritionalValues> {
        let nutrition = self.analysis.nutritional_values.as_ref()?;

        Some(match self.nutrition_unit {
            NutritionUnit::PerServing => nutrition.per_serving,
            NutritionUnit::Per100g => nutrition.per100g,
            NutritionUnit::Custom => nutrition.per100g.scaled_to_grams(&self.custom_grams),
        })
    }
}

/// In-memory state of one running session.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub screen: Screen,
    pub tab: Tab,
    pub profile: Profile,
    pub preferences: Preferences,
    pub result: Option<ResultView>,
    generation: u64,
    in_flight: Option<RequestTicket>,
    notifications: Vec<String>,
}

impl SessionState {
    pub fn new(profile: Profile, preferences: Preferences) -> Self {
        Self {
            profile,
            preferences,
            ..Self::default()
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Move to `screen`. Any outstanding request is abandoned.
    pub fn navigate(&mut self, screen: Screen) {
        self.generation += 1;
        self.in_flight = None;
        self.screen = screen;
    }

    pub fn begin_request(&mut self, kind: RequestKind) -> Result<RequestTicket, CoreError> {
        if self.in_flight.is_some() {
            return Err(CoreError::Busy);
        }

        let ticket = RequestTicket {
            kind,
            screen: self.screen,
            generation: self.generation,
        };
        self.in_flight = Some(ticket);

        Ok(ticket)
    }

    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        self.in_flight.as_ref() == Some(ticket)
            && ticket.generation == self.generation
            && ticket.screen == self.screen
    }

    /// Release the busy flag if `ticket` is still current. Returns false for stale tickets.
    pub fn finish_request(&mut self, ticket: &RequestTicket) -> bool {
        if !self.is_current(ticket) {
            return false;
        }
        self.in_flight = None;
        true
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notifications.push(message.into());
    }

    pub fn drain_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }
}
