use foodlenz_core::domain::{
    food_analysis::entities::{FoodAnalysis, HealthFlag, NutritionalValues, Preferences, Profile},
    library::entities::{Favorite, HistoryEntry},
    session::entities::{NutritionUnit, ResultView},
};

const RULE: &str = "----------------------------------------";

pub fn stars(analysis: &FoodAnalysis) -> String {
    let lit = usize::from(analysis.rounded_stars());
    format!(
        "{}{} {:.1}/5",
        "*".repeat(lit),
        ".".repeat(5 - lit),
        analysis.star_rating
    )
}

fn health_marker(flag: HealthFlag) -> &'static str {
    match flag {
        HealthFlag::Good => "[+]",
        HealthFlag::Bad => "[-]",
        HealthFlag::Neutral => "[ ]",
    }
}

fn unit_label(view: &ResultView, serving_size: &str) -> String {
    match view.nutrition_unit {
        NutritionUnit::PerServing => format!("per serving ({})", serving_size),
        NutritionUnit::Per100g => "per 100 g".to_string(),
        NutritionUnit::Custom => format!("per {} g", view.custom_grams),
    }
}

pub fn history_line(position: usize, entry: &HistoryEntry) -> String {
    format!(
        "{:>2}. {} {}  {}  ({})",
        position + 1,
        entry.analysis.food_name,
        stars(&entry.analysis),
        entry.created_at.format("%Y-%m-%d %H:%M"),
        entry.profile_snapshot.label()
    )
}

pub fn favorite_line(position: usize, favorite: &Favorite) -> String {
    format!(
        "{:>2}. {} {}",
        position + 1,
        favorite.name(),
        stars(&favorite.analysis)
    )
}

pub fn home(profile: Profile, recent: &[HistoryEntry]) -> String {
    let mut lines = vec![
        "FoodLenz".to_string(),
        format!("Profile: {}", profile.label()),
        RULE.to_string(),
        "search <food> or upload <photo> to get started.".to_string(),
    ];

    if !recent.is_empty() {
        lines.push(String::new());
        lines.push("Recent scans:".to_string());
        lines.extend(
            recent
                .iter()
                .enumerate()
                .map(|(position, entry)| history_line(position, entry)),
        );
    }

    lines.join("\n")
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No history yet.".to_string();
    }

    let mut lines = vec![format!("History ({})", entries.len()), RULE.to_string()];
    lines.extend(
        entries
            .iter()
            .enumerate()
            .map(|(position, entry)| history_line(position, entry)),
    );
    lines.join("\n")
}

pub fn favorites(favorites: &[Favorite], limit: usize) -> String {
    if favorites.is_empty() {
        return "No favorites yet. Open an analysis and type 'fav'.".to_string();
    }

    let mut lines = vec![
        format!("Favorites ({}/{})", favorites.len(), limit),
        RULE.to_string(),
    ];
    lines.extend(
        favorites
            .iter()
            .enumerate()
            .map(|(position, favorite)| favorite_line(position, favorite)),
    );
    lines.join("\n")
}

pub fn profile(profile: Profile, preferences: &Preferences) -> String {
    let mut lines = vec![
        "Health profile".to_string(),
        RULE.to_string(),
        format!("Current:   {}", profile.label()),
        format!("Allergies: {}", preferences.allergies_or_default()),
        format!("Goals:     {}", preferences.goals_or_default()),
        String::new(),
        "Available profiles:".to_string(),
    ];
    lines.extend(
        Profile::ALL
            .iter()
            .map(|p| format!("  {:<12} {}", p.as_str(), p.label())),
    );
    lines.join("\n")
}

pub fn nutrition(values: &NutritionalValues) -> String {
    let dv = values.daily_value_percent();
    [
        format!("  Calories {:>7} kcal  {:>3}% DV", values.calories, dv.calories),
        format!("  Protein  {:>7} g     {:>3}% DV", values.protein, dv.protein),
        format!("  Carbs    {:>7} g     {:>3}% DV", values.carbs, dv.carbs),
        format!("  Fat      {:>7} g     {:>3}% DV", values.fat, dv.fat),
    ]
    .join("\n")
}

pub fn result(view: &ResultView, current: Option<NutritionalValues>) -> String {
    let analysis = &view.analysis;
    let mut lines = vec![
        format!(
            "{}{}",
            analysis.food_name,
            if view.is_favorite { "  (favorite)" } else { "" }
        ),
        stars(analysis),
        RULE.to_string(),
        analysis.verdict.clone(),
        String::new(),
        analysis.detailed_analysis.clone(),
        format!("Portion: {}", analysis.portion_recommendation),
    ];

    if let (Some(breakdown), Some(values)) = (&analysis.nutritional_values, current) {
        lines.push(String::new());
        lines.push(format!(
            "Nutrition {}",
            unit_label(view, &breakdown.serving_size)
        ));
        lines.push(nutrition(&values));
    }

    lines.push(String::new());
    lines.push("Ingredients:".to_string());
    for (position, ingredient) in view.ingredients.iter().enumerate() {
        let mut line = format!(
            "{:>2}. {} {} [{}]",
            position + 1,
            health_marker(ingredient.health),
            ingredient.name,
            ingredient.category_kind().label()
        );
        if let Some(quantity) = &ingredient.quantity {
            line.push_str(&format!(" ({})", quantity));
        }
        if let Some(impact) = &ingredient.impact {
            line.push_str(&format!(" - {}", impact));
        }
        lines.push(line);
        if let Some(note) = &ingredient.health_note {
            lines.push(format!("      {}", note));
        }
    }
    if view.has_unsaved_changes {
        lines.push("Quantities changed. Type 'update' to recalculate.".to_string());
    }

    if !analysis.pairing_recommendations.is_empty() {
        lines.push(String::new());
        lines.push(format!(
            "Pairs well with: {}",
            analysis.pairing_recommendations.join(", ")
        ));
    }

    if !analysis.recipes.is_empty() {
        lines.push(String::new());
        lines.push("Recipes:".to_string());
        for recipe in &analysis.recipes {
            lines.push(format!(
                "  {} ({}, {}): {}",
                recipe.name, recipe.time, recipe.calories, recipe.description
            ));
            lines.push(format!("    {}", recipe.link()));
        }
    }

    if !view.chat.is_empty() {
        lines.push(String::new());
        lines.push("Chat:".to_string());
        lines.extend(
            view.chat
                .iter()
                .map(|message| format!("  {}: {}", message.role.as_str(), message.text)),
        );
    }

    lines.join("\n")
}
