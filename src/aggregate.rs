//! Totals, weekly series and streaks over the meal log.
//!
//! Everything here is recomputed from the full meal list on every call; there
//! is no running total to keep in sync when meals are added or deleted.

use std::collections::HashMap;

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::day_key;
use crate::models::{
    DailyStatus, DailyTotals, DayPoint, MacroProgress, MacroTargets, MealEntry, WeeklySeries,
};

/// Sum the meals logged on `reference_day` (a `dd/mm/yyyy` key).
pub fn aggregate_totals(meals: &[MealEntry], reference_day: &str) -> DailyTotals {
    meals
        .iter()
        .filter(|m| day_key::same_day(&m.day_key, reference_day))
        .fold(DailyTotals::default(), |mut acc, meal| {
            acc.calories += meal.calories();
            acc.protein_grams += meal.protein();
            acc.carb_grams += meal.carbs();
            acc.fat_grams += meal.fat();
            acc.meal_count += 1;
            acc
        })
}

impl DailyStatus {
    pub fn evaluate(totals: &DailyTotals, daily_budget: i64) -> Self {
        let budget = daily_budget as f64;
        let over_budget = totals.calories > budget;

        // f64 -> i64 casts saturate, so extreme totals cannot overflow here
        Self {
            remaining: (budget - totals.calories.round()).max(0.0) as i64,
            over_budget,
            overshoot: if over_budget {
                (totals.calories - budget).round() as i64
            } else {
                0
            },
        }
    }
}

impl MacroProgress {
    pub fn from_totals(totals: &DailyTotals, targets: &MacroTargets) -> Self {
        Self {
            protein_percent: capped_percent(totals.protein_grams, targets.protein_grams),
            carb_percent: capped_percent(totals.carb_grams, targets.carb_grams),
            fat_percent: capped_percent(totals.fat_grams, targets.fat_grams),
        }
    }
}

fn capped_percent(current: f64, target: i64) -> f64 {
    if target <= 0 {
        return 0.0;
    }
    (current / target as f64 * 100.0).clamp(0.0, 100.0)
}

/// Calories per calendar day. Entries whose key is not a date are skipped.
pub fn calories_by_day(meals: &[MealEntry]) -> HashMap<NaiveDate, f64> {
    let mut days: HashMap<NaiveDate, f64> = HashMap::new();
    for meal in meals {
        match day_key::parse(&meal.day_key) {
            Ok(date) => *days.entry(date).or_insert(0.0) += meal.calories(),
            Err(e) => debug!(error = %e, "meal without a usable day key"),
        }
    }
    days
}

/// The 7 days ending at `today`, oldest first.
pub fn build_weekly_series(
    meals: &[MealEntry],
    today: NaiveDate,
    daily_budget: i64,
) -> WeeklySeries {
    let by_day = calories_by_day(meals);

    let days = (0..7u64)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let calories = by_day.get(&date).copied().unwrap_or(0.0);
            DayPoint {
                date,
                day_key: day_key::format(date),
                label: date.format("%a").to_string(),
                calories,
                over_budget: calories > daily_budget as f64,
            }
        })
        .collect();

    WeeklySeries { days }
}

/// Consecutive days with logged calories, counting back from `today`.
pub fn compute_streak(meals: &[MealEntry], today: NaiveDate) -> u32 {
    let by_day = calories_by_day(meals);

    let mut streak = 0;
    let mut day = today;
    while by_day.get(&day).is_some_and(|kcal| *kcal != 0.0) {
        streak += 1;
        match day.pred_opt() {
            Some(prev) => day = prev,
            None => break,
        }
    }
    streak
}
