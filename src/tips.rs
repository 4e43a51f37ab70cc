use serde::{Deserialize, Serialize};

use crate::config::TipConfig;

/// Dashboard advice, picked from the budget state and the local hour.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Tip {
    OverBudget,
    StartYourDay,
    MorningHydration,
    LowAfternoonIntake,
    StableEnergy,
    FullDinner,
    LightDinner,
    WellBalanced,
}

impl Tip {
    pub fn message(&self) -> &'static str {
        match self {
            Tip::OverBudget => "Budget exceeded. To compensate, favour fiber (green vegetables) and plenty of water at your next meal.",
            Tip::StartYourDay => "Good morning! Start with a glass of water and a protein-rich breakfast to keep your energy steady.",
            Tip::MorningHydration => "Good start to the day! Remember to stay well hydrated before lunch.",
            Tip::LowAfternoonIntake => "Your intake is low for the afternoon. A healthy snack (nuts or fruit) will help avoid a sudden slump.",
            Tip::StableEnergy => "Energy holding up? If you feel a dip, go for green tea rather than a sugary snack.",
            Tip::FullDinner => "You still have room. A full dinner with complex carbs (brown rice, sweet potato) will help you sleep better.",
            Tip::LightDinner => "The evening is here. Keep dinner light so digestion doesn't weigh on your sleep.",
            Tip::WellBalanced => "Great balance today! Your metabolism thanks you.",
        }
    }
}

/// First matching rule wins: over budget, then morning [5,12), afternoon
/// [12,18), evening [18,24), and night [0,5) last.
pub fn select_tip(calories_today: f64, daily_budget: i64, hour: u32, config: &TipConfig) -> Tip {
    let budget = daily_budget as f64;
    let hour = hour % 24;

    if calories_today > budget {
        return Tip::OverBudget;
    }

    match hour {
        5..=11 => {
            if calories_today == 0.0 {
                Tip::StartYourDay
            } else {
                Tip::MorningHydration
            }
        }
        12..=17 => {
            if calories_today < budget * config.low_intake_ratio {
                Tip::LowAfternoonIntake
            } else {
                Tip::StableEnergy
            }
        }
        18..=23 => {
            let remaining = budget - calories_today;
            if remaining > config.dinner_room_kcal {
                Tip::FullDinner
            } else {
                Tip::LightDinner
            }
        }
        _ => Tip::WellBalanced,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tip(calories: f64, budget: i64, hour: u32) -> Tip {
        select_tip(calories, budget, hour, &TipConfig::default())
    }

    #[test]
    fn over_budget_wins_at_any_hour() {
        for hour in 0..24 {
            assert_eq!(tip(3000.0, 1614, hour), Tip::OverBudget, "hour {hour}");
        }
    }

    #[test]
    fn morning_rules() {
        assert_eq!(tip(0.0, 2000, 5), Tip::StartYourDay);
        assert_eq!(tip(0.0, 2000, 11), Tip::StartYourDay);
        assert_eq!(tip(300.0, 2000, 8), Tip::MorningHydration);
    }

    #[test]
    fn afternoon_threshold_is_thirty_percent() {
        assert_eq!(tip(599.0, 2000, 12), Tip::LowAfternoonIntake);
        assert_eq!(tip(600.0, 2000, 12), Tip::StableEnergy);
        assert_eq!(tip(1200.0, 2000, 17), Tip::StableEnergy);
    }

    #[test]
    fn evening_depends_on_room_left() {
        assert_eq!(tip(1499.0, 2000, 18), Tip::FullDinner);
        assert_eq!(tip(1500.0, 2000, 18), Tip::LightDinner);
        assert_eq!(tip(2000.0, 2000, 23), Tip::LightDinner);
    }

    #[test]
    fn night_is_the_fallback() {
        assert_eq!(tip(0.0, 2000, 0), Tip::WellBalanced);
        assert_eq!(tip(1000.0, 2000, 4), Tip::WellBalanced);
    }

    #[test]
    fn hour_wraps() {
        assert_eq!(tip(0.0, 2000, 29), Tip::StartYourDay);
    }

    #[test]
    fn messages_are_distinct() {
        let all = [
            Tip::OverBudget,
            Tip::StartYourDay,
            Tip::MorningHydration,
            Tip::LowAfternoonIntake,
            Tip::StableEnergy,
            Tip::FullDinner,
            Tip::LightDinner,
            Tip::WellBalanced,
        ];
        let mut messages: Vec<_> = all.iter().map(Tip::message).collect();
        messages.sort();
        messages.dedup();
        assert_eq!(messages.len(), all.len());
    }
}
