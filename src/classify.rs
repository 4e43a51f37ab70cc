//! Maps free-text profile answers onto closed categories.
//!
//! The signup forms store French labels ("Homme", "Modérément actif",
//! "Perte de poids") but profiles edited elsewhere may carry English ones, so
//! both are recognised. Anything unrecognised falls back to a fixed default.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Sex used for the BMR constant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Sex {
    Male,
    /// Female, or any answer not recognised as male (including unset).
    FemaleOrUnknown,
}

impl Sex {
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return Sex::FemaleOrUnknown;
        };
        let lower = text.to_lowercase();

        if lower.contains("hom") || lower.contains("masc") {
            return Sex::Male;
        }
        let whole_word = lower
            .split(|c: char| !c.is_alphanumeric())
            .any(|w| matches!(w, "male" | "man" | "m"));
        if whole_word {
            Sex::Male
        } else {
            Sex::FemaleOrUnknown
        }
    }
}

/// Activity tier for the TDEE multiplier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActivityLevel {
    Sedentary,
    LightlyActive,
    ModeratelyActive,
    VeryActive,
    ExtremelyActive,
}

const ACTIVITY_LABELS: &[(&str, ActivityLevel)] = &[
    ("sédentaire", ActivityLevel::Sedentary),
    ("sedentaire", ActivityLevel::Sedentary),
    ("sedentary", ActivityLevel::Sedentary),
    ("légèrement actif", ActivityLevel::LightlyActive),
    ("legerement actif", ActivityLevel::LightlyActive),
    ("lightly active", ActivityLevel::LightlyActive),
    ("modérément actif", ActivityLevel::ModeratelyActive),
    ("moderement actif", ActivityLevel::ModeratelyActive),
    ("moderately active", ActivityLevel::ModeratelyActive),
    ("très actif", ActivityLevel::VeryActive),
    ("tres actif", ActivityLevel::VeryActive),
    ("very active", ActivityLevel::VeryActive),
    ("extrêmement actif", ActivityLevel::ExtremelyActive),
    ("extremement actif", ActivityLevel::ExtremelyActive),
    ("extremely active", ActivityLevel::ExtremelyActive),
];

impl ActivityLevel {
    pub fn classify(raw: Option<&str>) -> Self {
        let Some(text) = raw else {
            return ActivityLevel::Sedentary;
        };
        let key = normalize_label(text);
        if key.is_empty() {
            return ActivityLevel::Sedentary;
        }

        match ACTIVITY_LABELS.iter().find(|(label, _)| *label == key) {
            Some((_, level)) => *level,
            None => {
                debug!(label = %text, "unrecognised activity level, using sedentary");
                ActivityLevel::Sedentary
            }
        }
    }
}

/// Lowercase, trim, treat `-`/`_` as spaces and collapse runs of whitespace.
fn normalize_label(text: &str) -> String {
    text.to_lowercase()
        .replace(['-', '_'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Calorie goal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Goal {
    WeightLoss,
    Maintenance,
    MuscleGain,
}

impl Goal {
    pub fn classify(raw: Option<&str>) -> Self {
        let goal = raw.map(|g| g.trim().to_lowercase()).unwrap_or_default();

        if ["perte", "loss", "lose"].iter().any(|t| goal.contains(t)) {
            Goal::WeightLoss
        } else if ["prise", "gain"].iter().any(|t| goal.contains(t)) {
            Goal::MuscleGain
        } else {
            Goal::Maintenance
        }
    }
}
