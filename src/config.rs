use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

use crate::classify::{ActivityLevel, Goal, Sex};

/// All tunable constants of the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub budget: BudgetConfig,
    pub macros: MacroSplitConfig,
    pub tips: TipConfig,
    pub hydration: HydrationConfig,
}

/// Mifflin-St Jeor coefficients, activity multipliers and goal adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BudgetConfig {
    /// Budget used when metrics are missing or unreadable (kcal/day)
    pub fallback_budget: i64,
    pub weight_coef: f64,
    pub height_coef: f64,
    /// Subtracted per year of age
    pub age_coef: f64,
    pub male_constant: f64,
    pub female_constant: f64,
    pub activity: ActivityMultipliers,
    /// Subtracted for weight loss, added for muscle gain (kcal/day)
    pub goal_adjustment: f64,
}

impl Default for BudgetConfig {
    fn default() -> Self {
        Self {
            fallback_budget: 2000,
            weight_coef: 10.0,
            height_coef: 6.25,
            age_coef: 5.0,
            male_constant: 5.0,
            female_constant: -161.0,
            activity: ActivityMultipliers::default(),
            goal_adjustment: 500.0,
        }
    }
}

impl BudgetConfig {
    pub fn sex_constant(&self, sex: Sex) -> f64 {
        match sex {
            Sex::Male => self.male_constant,
            Sex::FemaleOrUnknown => self.female_constant,
        }
    }

    pub fn goal_offset(&self, goal: Goal) -> f64 {
        match goal {
            Goal::WeightLoss => -self.goal_adjustment,
            Goal::MuscleGain => self.goal_adjustment,
            Goal::Maintenance => 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityMultipliers {
    pub sedentary: f64,
    pub lightly_active: f64,
    pub moderately_active: f64,
    pub very_active: f64,
    pub extremely_active: f64,
}

impl Default for ActivityMultipliers {
    fn default() -> Self {
        Self {
            sedentary: 1.2,
            lightly_active: 1.375,
            moderately_active: 1.55,
            very_active: 1.725,
            extremely_active: 1.9,
        }
    }
}

impl ActivityMultipliers {
    pub fn for_level(&self, level: ActivityLevel) -> f64 {
        match level {
            ActivityLevel::Sedentary => self.sedentary,
            ActivityLevel::LightlyActive => self.lightly_active,
            ActivityLevel::ModeratelyActive => self.moderately_active,
            ActivityLevel::VeryActive => self.very_active,
            ActivityLevel::ExtremelyActive => self.extremely_active,
        }
    }

    fn all(&self) -> [f64; 5] {
        [
            self.sedentary,
            self.lightly_active,
            self.moderately_active,
            self.very_active,
            self.extremely_active,
        ]
    }
}

/// Share of calories per macro (percent) and energy density (kcal/g).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MacroSplitConfig {
    pub protein_percent: f64,
    pub carb_percent: f64,
    pub fat_percent: f64,
    pub protein_kcal_per_gram: f64,
    pub carb_kcal_per_gram: f64,
    pub fat_kcal_per_gram: f64,
}

impl Default for MacroSplitConfig {
    fn default() -> Self {
        Self {
            protein_percent: 25.0,
            carb_percent: 50.0,
            fat_percent: 25.0,
            protein_kcal_per_gram: 4.0,
            carb_kcal_per_gram: 4.0,
            fat_kcal_per_gram: 9.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TipConfig {
    /// Afternoon intake below this fraction of the budget counts as low
    pub low_intake_ratio: f64,
    /// Evening budget left above this means there is room for a full dinner
    pub dinner_room_kcal: f64,
}

impl Default for TipConfig {
    fn default() -> Self {
        Self {
            low_intake_ratio: 0.3,
            dinner_room_kcal: 500.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HydrationConfig {
    pub daily_glasses: u32,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self { daily_glasses: 8 }
    }
}

impl EngineConfig {
    /// Parse a (possibly partial) JSON document; missing keys keep defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: EngineConfig =
            serde_json::from_str(json).context("invalid engine config JSON")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Defaults, then `NUTRI_CONFIG` (JSON file), then single-value overrides.
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = match std::env::var("NUTRI_CONFIG") {
            Ok(path) => Self::from_file(path)?,
            Err(_) => Self::default(),
        };

        if let Some(v) = env_parse::<i64>("NUTRI_FALLBACK_BUDGET")? {
            config.budget.fallback_budget = v;
        }
        if let Some(v) = env_parse::<f64>("NUTRI_GOAL_ADJUSTMENT")? {
            config.budget.goal_adjustment = v;
        }
        if let Some(v) = env_parse::<u32>("NUTRI_WATER_GLASSES")? {
            config.hydration.daily_glasses = v;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.budget.fallback_budget <= 0 {
            return Err(anyhow!("fallback budget must be positive"));
        }
        if self
            .budget
            .activity
            .all()
            .iter()
            .any(|m| !m.is_finite() || *m <= 0.0)
        {
            return Err(anyhow!("activity multipliers must be positive"));
        }

        let m = &self.macros;
        let total = m.protein_percent + m.carb_percent + m.fat_percent;
        if (total - 100.0).abs() > 1e-9 {
            return Err(anyhow!("macro percentages must sum to 100, got {}", total));
        }
        if [
            m.protein_kcal_per_gram,
            m.carb_kcal_per_gram,
            m.fat_kcal_per_gram,
        ]
        .iter()
        .any(|k| *k <= 0.0)
        {
            return Err(anyhow!("kcal per gram must be positive"));
        }

        if !(0.0..=1.0).contains(&self.tips.low_intake_ratio) {
            return Err(anyhow!("low intake ratio must be within 0..=1"));
        }
        Ok(())
    }
}

fn env_parse<T>(key: &str) -> Result<Option<T>>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| anyhow!("{} = {:?}: {}", key, raw, e)),
        Err(_) => Ok(None),
    }
}
