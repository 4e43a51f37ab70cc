use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::aggregate::{aggregate_totals, build_weekly_series, compute_streak};
use crate::day_key;
use crate::models::MealEntry;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum BadgeKind {
    /// At least 3 meals logged
    Active,
    /// Today's calories are logged and within budget
    Goal,
    /// Logged 3 days in a row or more
    Streak,
    /// A full week logged without going over budget
    Discipline,
    /// At least 50 meals logged
    Loyal,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeStatus {
    pub kind: BadgeKind,
    pub label: String,
    pub earned: bool,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BadgeInputs {
    pub total_meals: usize,
    pub streak: u32,
    pub goal_reached_today: bool,
    pub perfect_week: bool,
}

impl BadgeInputs {
    pub fn from_log(meals: &[MealEntry], today: NaiveDate, daily_budget: i64) -> Self {
        let budget = daily_budget as f64;
        let today_totals = aggregate_totals(meals, &day_key::format(today));
        let week = build_weekly_series(meals, today, daily_budget);

        Self {
            total_meals: meals.len(),
            streak: compute_streak(meals, today),
            goal_reached_today: today_totals.calories > 0.0 && today_totals.calories <= budget,
            perfect_week: week
                .days
                .iter()
                .all(|d| d.calories > 0.0 && !d.over_budget),
        }
    }
}

pub fn evaluate_badges(inputs: &BadgeInputs) -> Vec<BadgeStatus> {
    let badge = |kind, label: String, earned| BadgeStatus { kind, label, earned };

    vec![
        badge(BadgeKind::Active, "Active".into(), inputs.total_meals >= 3),
        badge(BadgeKind::Goal, "Goal".into(), inputs.goal_reached_today),
        badge(
            BadgeKind::Streak,
            format!("{}-day streak", inputs.streak),
            inputs.streak >= 3,
        ),
        badge(BadgeKind::Discipline, "Discipline".into(), inputs.perfect_week),
        badge(BadgeKind::Loyal, "Loyal".into(), inputs.total_meals >= 50),
    ]
}
