use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static LEADING_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?(\d+(\.\d*)?|\.\d+)").expect("valid regex"));

/// Reference daily intake used for the "% daily value" column.
pub const DAILY_CALORIES: f64 = 2000.0;
pub const DAILY_PROTEIN_G: f64 = 50.0;
pub const DAILY_CARBS_G: f64 = 275.0;
pub const DAILY_FAT_G: f64 = 78.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NutritionalValues {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NutritionBreakdown {
    pub per100g: NutritionalValues,
    pub per_serving: NutritionalValues,
    pub serving_size: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyValuePercent {
    pub calories: i64,
    pub protein: i64,
    pub carbs: i64,
    pub fat: i64,
}

impl NutritionalValues {
    pub fn new(calories: f64, protein: f64, carbs: f64, fat: f64) -> Self {
        Self {
            calories,
            protein,
            carbs,
            fat,
        }
    }

    pub fn is_valid(&self) -> bool {
        [self.calories, self.protein, self.carbs, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }

    /// Projects per-100g values onto an arbitrary gram amount typed by the user.
    ///
    /// Calories are rounded to whole units and macros to one decimal. Text that
    /// does not start with a positive number projects to zero.
    pub fn scaled_to_grams(&self, grams: &str) -> NutritionalValues {
        let factor = parse_grams(grams) / 100.0;

        NutritionalValues {
            calories: (self.calories * factor).round(),
            protein: round_one_decimal(self.protein * factor),
            carbs: round_one_decimal(self.carbs * factor),
            fat: round_one_decimal(self.fat * factor),
        }
    }

    pub fn daily_value_percent(&self) -> DailyValuePercent {
        let pct = |value: f64, reference: f64| ((value / reference) * 100.0).round() as i64;

        DailyValuePercent {
            calories: pct(self.calories, DAILY_CALORIES),
            protein: pct(self.protein, DAILY_PROTEIN_G),
            carbs: pct(self.carbs, DAILY_CARBS_G),
            fat: pct(self.fat, DAILY_FAT_G),
        }
    }
}

impl NutritionBreakdown {
    pub fn is_valid(&self) -> bool {
        self.per100g.is_valid() && self.per_serving.is_valid()
    }
}

fn parse_grams(text: &str) -> f64 {
    LEADING_NUMBER
        .find(text)
        .and_then(|m| m.as_str().trim().parse::<f64>().ok())
        .filter(|g| g.is_finite() && *g > 0.0)
        .unwrap_or(0.0)
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> NutritionalValues {
        NutritionalValues::new(250.0, 10.0, 30.0, 8.0)
    }

    #[test]
    fn test_scaled_to_grams() {
        let derived = base().scaled_to_grams("150");
        assert_eq!(derived, NutritionalValues::new(375.0, 15.0, 45.0, 12.0));
    }

    #[test]
    fn test_scaled_to_zero_or_garbage_is_zero() {
        assert_eq!(base().scaled_to_grams("0"), NutritionalValues::default());
        assert_eq!(base().scaled_to_grams("abc"), NutritionalValues::default());
        assert_eq!(base().scaled_to_grams(""), NutritionalValues::default());
        assert_eq!(base().scaled_to_grams("-20"), NutritionalValues::default());
    }

    #[test]
    fn test_scaled_accepts_unit_suffix_and_rounds() {
        let derived = base().scaled_to_grams(" 33g");
        assert_eq!(derived.calories, 83.0);
        assert_eq!(derived.protein, 3.3);
        assert_eq!(derived.carbs, 9.9);
        assert_eq!(derived.fat, 2.6);
    }

    #[test]
    fn test_scaling_does_not_touch_base() {
        let values = base();
        let first = values.scaled_to_grams("150");
        let second = values.scaled_to_grams("150");
        assert_eq!(first, second);
        assert_eq!(values, base());
    }

    #[test]
    fn test_daily_value_percent() {
        let pct = base().daily_value_percent();
        assert_eq!(pct.calories, 13);
        assert_eq!(pct.protein, 20);
        assert_eq!(pct.carbs, 11);
        assert_eq!(pct.fat, 10);
    }

    #[test]
    fn test_negative_values_are_invalid() {
        assert!(base().is_valid());
        assert!(!NutritionalValues::new(-1.0, 0.0, 0.0, 0.0).is_valid());
        assert!(!NutritionalValues::new(f64::NAN, 0.0, 0.0, 0.0).is_valid());
    }
}
