use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::budget::FallbackReason;
use crate::classify::{ActivityLevel, Goal, Sex};

/// Body metrics as captured by the signup and profile forms.
///
/// Numeric fields stay as text until validation; categorical fields are free
/// text in whatever language the form used.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserMetrics {
    /// Weight in kg
    pub weight: Option<String>,
    /// Height in cm
    pub height: Option<String>,
    /// Age in years
    pub age: Option<String>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

impl UserMetrics {
    /// Convenience constructor for numeric input.
    pub fn new(weight: f64, height: f64, age: u32) -> Self {
        Self {
            weight: Some(weight.to_string()),
            height: Some(height.to_string()),
            age: Some(age.to_string()),
            ..Default::default()
        }
    }

    pub fn with_sex(mut self, sex: &str) -> Self {
        self.sex = Some(sex.to_string());
        self
    }

    pub fn with_activity(mut self, activity_level: &str) -> Self {
        self.activity_level = Some(activity_level.to_string());
        self
    }

    pub fn with_goal(mut self, goal: &str) -> Self {
        self.goal = Some(goal.to_string());
        self
    }
}

/// Daily calorie budget derived from one metrics snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalorieBudget {
    /// Mifflin-St Jeor basal metabolic rate (kcal/day). `None` on fallback.
    pub bmr: Option<f64>,
    /// BMR scaled by the activity multiplier (kcal/day). `None` on fallback.
    pub tdee: Option<f64>,
    /// Goal-adjusted target, rounded (kcal/day)
    pub daily_budget: i64,
    pub sex: Sex,
    pub activity: ActivityLevel,
    pub goal: Goal,
    /// Set when the metrics could not be used and the fixed default applies.
    pub fallback: Option<FallbackReason>,
}

impl CalorieBudget {
    pub fn is_fallback(&self) -> bool {
        self.fallback.is_some()
    }
}

/// Daily gram targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MacroTargets {
    pub protein_grams: i64,
    pub carb_grams: i64,
    pub fat_grams: i64,
}

impl MacroTargets {
    /// Calories implied by the rounded gram targets. Usually a few kcal off
    /// the budget they were derived from.
    pub fn gram_calories(&self) -> i64 {
        self.protein_grams
            .saturating_mul(4)
            .saturating_add(self.carb_grams.saturating_mul(4))
            .saturating_add(self.fat_grams.saturating_mul(9))
    }
}

/// A logged meal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MealEntry {
    pub name: Option<String>,
    /// Calories (kcal)
    pub calories: Option<f64>,
    /// Protein (g)
    pub protein_grams: Option<f64>,
    /// Carbs (g)
    pub carb_grams: Option<f64>,
    /// Fat (g)
    pub fat_grams: Option<f64>,
    /// Local calendar day, `dd/mm/yyyy`
    pub day_key: String,
    pub created_at: Option<DateTime<Utc>>,
}

impl MealEntry {
    pub fn new(name: &str, day_key: &str, calories: f64) -> Self {
        Self {
            name: Some(name.to_string()),
            calories: Some(calories),
            protein_grams: None,
            carb_grams: None,
            fat_grams: None,
            day_key: day_key.to_string(),
            created_at: None,
        }
    }

    pub fn with_macros(mut self, protein: f64, carbs: f64, fat: f64) -> Self {
        self.protein_grams = Some(protein);
        self.carb_grams = Some(carbs);
        self.fat_grams = Some(fat);
        self
    }

    pub fn calories(&self) -> f64 {
        finite_or_zero(self.calories)
    }

    pub fn protein(&self) -> f64 {
        finite_or_zero(self.protein_grams)
    }

    pub fn carbs(&self) -> f64 {
        finite_or_zero(self.carb_grams)
    }

    pub fn fat(&self) -> f64 {
        finite_or_zero(self.fat_grams)
    }
}

fn finite_or_zero(value: Option<f64>) -> f64 {
    value.filter(|v| v.is_finite()).unwrap_or(0.0)
}

/// Consumption summed over one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyTotals {
    pub calories: f64,
    pub protein_grams: f64,
    pub carb_grams: f64,
    pub fat_grams: f64,
    pub meal_count: usize,
}

/// Consumption measured against the budget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyStatus {
    /// Budget left, never negative
    pub remaining: i64,
    pub over_budget: bool,
    /// Rounded kcal above budget, 0 when within budget
    pub overshoot: i64,
}

/// Share of each macro target consumed, in percent (capped at 100).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacroProgress {
    pub protein_percent: f64,
    pub carb_percent: f64,
    pub fat_percent: f64,
}

/// One bar of the weekly chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPoint {
    pub date: NaiveDate,
    pub day_key: String,
    /// Short weekday name
    pub label: String,
    pub calories: f64,
    pub over_budget: bool,
}

/// Seven consecutive days ending today, oldest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklySeries {
    pub days: Vec<DayPoint>,
}

impl WeeklySeries {
    pub fn today(&self) -> Option<&DayPoint> {
        self.days.last()
    }

    pub fn total_calories(&self) -> f64 {
        self.days.iter().map(|d| d.calories).sum()
    }
}
