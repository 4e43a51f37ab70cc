//! Daily calorie budget and macro targets.
//!
//! BMR uses the Mifflin-St Jeor equation:
//! `10 x weight_kg + 6.25 x height_cm - 5 x age`, `+5` for men and `-161`
//! otherwise. TDEE scales BMR by an activity multiplier and the goal shifts it
//! by a flat amount. Metrics that cannot be read never produce an error; the
//! budget falls back to a fixed default instead.
//!
//! Numeric fields are read like the form layer reads them: the leading
//! number wins and anything after it is ignored.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::classify::{ActivityLevel, Goal, Sex};
use crate::config::{BudgetConfig, MacroSplitConfig};
use crate::models::{CalorieBudget, MacroTargets, UserMetrics};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MetricField {
    Weight,
    Height,
    Age,
}

impl fmt::Display for MetricField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MetricField::Weight => "weight",
            MetricField::Height => "height",
            MetricField::Age => "age",
        };
        f.write_str(name)
    }
}

/// Why the fallback budget was used.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq)]
pub enum FallbackReason {
    #[error("no metrics available")]
    MissingMetrics,
    #[error("{0} is missing")]
    MissingField(MetricField),
    #[error("{field} is not a number: {value:?}")]
    InvalidNumber { field: MetricField, value: String },
    #[error("{field} is out of range: {value}")]
    OutOfRange { field: MetricField, value: f64 },
}

/// Metrics that passed validation, with categories already classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidMetrics {
    pub weight_kg: f64,
    pub height_cm: f64,
    pub age: u32,
    pub sex: Sex,
    pub activity: ActivityLevel,
    pub goal: Goal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum MetricsCheck {
    Valid(ValidMetrics),
    Fallback(FallbackReason),
}

pub fn validate_metrics(metrics: Option<&UserMetrics>) -> MetricsCheck {
    let Some(metrics) = metrics else {
        return MetricsCheck::Fallback(FallbackReason::MissingMetrics);
    };

    let weight = match read_field(MetricField::Weight, metrics.weight.as_deref(), parse_decimal) {
        Ok(v) => v,
        Err(reason) => return MetricsCheck::Fallback(reason),
    };
    let height = match read_field(MetricField::Height, metrics.height.as_deref(), parse_decimal) {
        Ok(v) => v,
        Err(reason) => return MetricsCheck::Fallback(reason),
    };
    let age = match read_field(MetricField::Age, metrics.age.as_deref(), parse_integer) {
        Ok(v) => v,
        Err(reason) => return MetricsCheck::Fallback(reason),
    };

    if weight <= 0.0 {
        return MetricsCheck::Fallback(FallbackReason::OutOfRange {
            field: MetricField::Weight,
            value: weight,
        });
    }
    if height <= 0.0 {
        return MetricsCheck::Fallback(FallbackReason::OutOfRange {
            field: MetricField::Height,
            value: height,
        });
    }
    let age = match u32::try_from(age) {
        Ok(a) => a,
        Err(_) => {
            return MetricsCheck::Fallback(FallbackReason::OutOfRange {
                field: MetricField::Age,
                value: age as f64,
            })
        }
    };

    MetricsCheck::Valid(ValidMetrics {
        weight_kg: weight,
        height_cm: height,
        age,
        sex: Sex::classify(metrics.sex.as_deref()),
        activity: ActivityLevel::classify(metrics.activity_level.as_deref()),
        goal: Goal::classify(metrics.goal.as_deref()),
    })
}

fn read_field<T>(
    field: MetricField,
    raw: Option<&str>,
    parse: fn(&str) -> Option<T>,
) -> Result<T, FallbackReason> {
    let raw = raw.ok_or(FallbackReason::MissingField(field))?;
    if raw.trim().is_empty() {
        return Err(FallbackReason::MissingField(field));
    }
    parse(raw).ok_or_else(|| FallbackReason::InvalidNumber {
        field,
        value: raw.to_string(),
    })
}

/// Leading decimal number of `raw`, the way a form field holding "72.5 kg"
/// is read: the number stops at the first character that cannot continue it,
/// so "60,9" reads as 60. Exponents are accepted ("7e1" is 70); a value too
/// large to be finite is rejected.
fn parse_decimal(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    let end = numeric_prefix_len(trimmed, true);
    trimmed[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Leading integer of `raw`; a fractional part or exponent is dropped.
fn parse_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let end = numeric_prefix_len(trimmed, false);
    trimmed[..end].parse::<i64>().ok()
}

fn digits_from(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

fn numeric_prefix_len(s: &str, decimal: bool) -> usize {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_digits = digits_from(bytes, i);
    i += int_digits;
    let mut has_digits = int_digits > 0;

    if !decimal {
        return if has_digits { i } else { 0 };
    }

    if bytes.get(i) == Some(&b'.') {
        let frac_digits = digits_from(bytes, i + 1);
        if frac_digits > 0 || has_digits {
            // "72." parses as 72
            i += 1 + frac_digits;
            has_digits = true;
        }
    }

    if has_digits && matches!(bytes.get(i), Some(b'e' | b'E')) {
        let mut j = i + 1;
        if matches!(bytes.get(j), Some(b'+' | b'-')) {
            j += 1;
        }
        let exp_digits = digits_from(bytes, j);
        if exp_digits > 0 {
            i = j + exp_digits;
        }
    }

    if has_digits {
        i
    } else {
        0
    }
}

pub fn calculate_bmr(metrics: &ValidMetrics, config: &BudgetConfig) -> f64 {
    let base = (config.weight_coef * metrics.weight_kg) + (config.height_coef * metrics.height_cm)
        - (config.age_coef * f64::from(metrics.age));
    base + config.sex_constant(metrics.sex)
}

pub fn calculate_tdee(bmr: f64, activity: ActivityLevel, config: &BudgetConfig) -> f64 {
    bmr * config.activity.for_level(activity)
}

/// Compute the budget for one metrics snapshot. Always returns a usable budget.
pub fn compute_budget(metrics: Option<&UserMetrics>, config: &BudgetConfig) -> CalorieBudget {
    match validate_metrics(metrics) {
        MetricsCheck::Valid(valid) => {
            let bmr = calculate_bmr(&valid, config);
            let tdee = calculate_tdee(bmr, valid.activity, config);
            let adjusted = tdee + config.goal_offset(valid.goal);

            CalorieBudget {
                bmr: Some(bmr),
                tdee: Some(tdee),
                daily_budget: adjusted.round() as i64,
                sex: valid.sex,
                activity: valid.activity,
                goal: valid.goal,
                fallback: None,
            }
        }
        MetricsCheck::Fallback(reason) => {
            debug!(%reason, budget = config.fallback_budget, "using fallback calorie budget");
            CalorieBudget {
                bmr: None,
                tdee: None,
                daily_budget: config.fallback_budget,
                sex: Sex::classify(metrics.and_then(|m| m.sex.as_deref())),
                activity: ActivityLevel::classify(
                    metrics.and_then(|m| m.activity_level.as_deref()),
                ),
                goal: Goal::classify(metrics.and_then(|m| m.goal.as_deref())),
                fallback: Some(reason),
            }
        }
    }
}

/// Split a budget into gram targets. Each macro is rounded on its own, so the
/// targets rarely add back up to the exact budget.
pub fn compute_macros(daily_budget: i64, config: &MacroSplitConfig) -> MacroTargets {
    let budget = daily_budget as f64;
    let grams = |percent: f64, kcal_per_gram: f64| {
        ((budget * (percent / 100.0)) / kcal_per_gram).round() as i64
    };

    MacroTargets {
        protein_grams: grams(config.protein_percent, config.protein_kcal_per_gram),
        carb_grams: grams(config.carb_percent, config.carb_kcal_per_gram),
        fat_grams: grams(config.fat_percent, config.fat_kcal_per_gram),
    }
}
