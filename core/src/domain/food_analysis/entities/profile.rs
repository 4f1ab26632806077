use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Health-goal category every analysis is rated against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Profile {
    #[default]
    General,
    Diabetic,
    Athlete,
    LiverCare,
    WeightLoss,
    Vegan,
}

impl Profile {
    pub const ALL: [Profile; 6] = [
        Profile::General,
        Profile::Diabetic,
        Profile::Athlete,
        Profile::LiverCare,
        Profile::WeightLoss,
        Profile::Vegan,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Profile::General => "general",
            Profile::Diabetic => "diabetic",
            Profile::Athlete => "athlete",
            Profile::LiverCare => "liver-care",
            Profile::WeightLoss => "weight-loss",
            Profile::Vegan => "vegan",
        }
    }

    /// Label used in prompts and on screen.
    pub fn label(&self) -> &'static str {
        match self {
            Profile::General => "General",
            Profile::Diabetic => "Diabetic",
            Profile::Athlete => "Gym Rat / Athlete",
            Profile::LiverCare => "Liver Issues",
            Profile::WeightLoss => "Weight Loss",
            Profile::Vegan => "Vegan",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace([' ', '_'], "-");
        Profile::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted || p.label().to_lowercase() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown profile '{}'", s.trim()))
    }
}

/// Free-text dietary preferences. Only persisted as part of an analysis request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preferences {
    pub allergies: String,
    pub custom_goals: String,
}

impl Preferences {
    pub fn new(allergies: impl Into<String>, custom_goals: impl Into<String>) -> Self {
        Self {
            allergies: allergies.into(),
            custom_goals: custom_goals.into(),
        }
    }

    pub fn allergies_or_default(&self) -> &str {
        match self.allergies.trim() {
            "" => "None",
            value => value,
        }
    }

    pub fn goals_or_default(&self) -> &str {
        match self.custom_goals.trim() {
            "" => "Standard for this profile",
            value => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_parse_accepts_kebab_and_label() {
        assert_eq!("liver-care".parse::<Profile>(), Ok(Profile::LiverCare));
        assert_eq!("Weight Loss".parse::<Profile>(), Ok(Profile::WeightLoss));
        assert_eq!("gym rat / athlete".parse::<Profile>(), Ok(Profile::Athlete));
        assert_eq!("VEGAN".parse::<Profile>(), Ok(Profile::Vegan));
        assert!("carnivore".parse::<Profile>().is_err());
    }

    #[test]
    fn test_profile_serializes_kebab_case() {
        let json = serde_json::to_string(&Profile::WeightLoss).unwrap();
        assert_eq!(json, "\"weight-loss\"");
    }

    #[test]
    fn test_preferences_defaults_for_prompt() {
        let prefs = Preferences::new("  ", "");
        assert_eq!(prefs.allergies_or_default(), "None");
        assert_eq!(prefs.goals_or_default(), "Standard for this profile");

        let prefs = Preferences::new("peanuts", "Low Sodium");
        assert_eq!(prefs.allergies_or_default(), "peanuts");
        assert_eq!(prefs.goals_or_default(), "Low Sodium");
    }
}
