use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

use crate::aggregate;
use crate::badges::{evaluate_badges, BadgeInputs, BadgeStatus};
use crate::budget;
use crate::config::EngineConfig;
use crate::day_key;
use crate::hydration;
use crate::models::*;
use crate::tips::{self, Tip};

/// Stateless entry point; every method is a pure function of its inputs and
/// the configuration.
#[derive(Debug, Clone, Default)]
pub struct NutritionEngine {
    config: EngineConfig,
}

/// Everything the dashboard shows for one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub day_key: String,
    pub budget: CalorieBudget,
    pub macro_targets: MacroTargets,
    pub totals: DailyTotals,
    pub status: DailyStatus,
    pub macro_progress: MacroProgress,
    pub weekly: WeeklySeries,
    pub streak: u32,
    pub water_glasses: u32,
    pub hydration_percent: u8,
    pub badges: Vec<BadgeStatus>,
    pub tip: Tip,
}

impl NutritionEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn compute_budget(&self, metrics: Option<&UserMetrics>) -> CalorieBudget {
        budget::compute_budget(metrics, &self.config.budget)
    }

    pub fn compute_macros(&self, daily_budget: i64) -> MacroTargets {
        budget::compute_macros(daily_budget, &self.config.macros)
    }

    pub fn aggregate_totals(&self, meals: &[MealEntry], reference_day: &str) -> DailyTotals {
        aggregate::aggregate_totals(meals, reference_day)
    }

    pub fn daily_status(&self, totals: &DailyTotals, daily_budget: i64) -> DailyStatus {
        DailyStatus::evaluate(totals, daily_budget)
    }

    pub fn build_weekly_series(
        &self,
        meals: &[MealEntry],
        today: NaiveDate,
        daily_budget: i64,
    ) -> WeeklySeries {
        aggregate::build_weekly_series(meals, today, daily_budget)
    }

    pub fn compute_streak(&self, meals: &[MealEntry], today: NaiveDate) -> u32 {
        aggregate::compute_streak(meals, today)
    }

    pub fn select_tip(&self, calories_today: f64, daily_budget: i64, hour: u32) -> Tip {
        tips::select_tip(calories_today, daily_budget, hour, &self.config.tips)
    }

    pub fn hydration_percent(&self, glasses: u32) -> u8 {
        hydration::hydration_percent(glasses, self.config.hydration.daily_glasses)
    }

    /// Compose every dashboard figure for local time `now`.
    pub fn dashboard(
        &self,
        metrics: Option<&UserMetrics>,
        meals: &[MealEntry],
        water_glasses: u32,
        now: NaiveDateTime,
    ) -> DashboardSnapshot {
        let today = now.date();
        let key = day_key::format(today);

        let budget = self.compute_budget(metrics);
        let daily_budget = budget.daily_budget;
        let macro_targets = self.compute_macros(daily_budget);
        let totals = self.aggregate_totals(meals, &key);
        let status = self.daily_status(&totals, daily_budget);
        let streak = self.compute_streak(meals, today);
        let badges = evaluate_badges(&BadgeInputs::from_log(meals, today, daily_budget));

        DashboardSnapshot {
            macro_progress: MacroProgress::from_totals(&totals, &macro_targets),
            weekly: self.build_weekly_series(meals, today, daily_budget),
            hydration_percent: self.hydration_percent(water_glasses),
            tip: self.select_tip(totals.calories, daily_budget, now.hour()),
            day_key: key,
            budget,
            macro_targets,
            totals,
            status,
            streak,
            water_glasses,
            badges,
        }
    }
}
