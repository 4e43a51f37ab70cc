use serde::{Deserialize, Serialize};

/// Percentage of the daily water target reached, capped at 100.
pub fn hydration_percent(glasses: u32, target: u32) -> u8 {
    if target == 0 {
        return 0;
    }
    let percent = (f64::from(glasses) / f64::from(target) * 100.0).round();
    percent.min(100.0) as u8
}

/// A point in the day by which a cumulative number of glasses is expected.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HydrationReminder {
    pub hour: u32,
    pub target_glasses: u32,
}

/// Every two hours from 09:00 to 23:00, one more glass each time.
pub const REMINDER_SCHEDULE: [HydrationReminder; 8] = [
    HydrationReminder { hour: 9, target_glasses: 1 },
    HydrationReminder { hour: 11, target_glasses: 2 },
    HydrationReminder { hour: 13, target_glasses: 3 },
    HydrationReminder { hour: 15, target_glasses: 4 },
    HydrationReminder { hour: 17, target_glasses: 5 },
    HydrationReminder { hour: 19, target_glasses: 6 },
    HydrationReminder { hour: 21, target_glasses: 7 },
    HydrationReminder { hour: 23, target_glasses: 8 },
];

impl HydrationReminder {
    pub fn message(&self, glasses: u32) -> String {
        match glasses {
            0 => "You haven't had any water yet today. Start with a big glass!".to_string(),
            1 => "You've only had 1 glass. Drink a little water to reach your goal!".to_string(),
            n => format!("You've only had {n} glasses. Drink a little water to reach your goal!"),
        }
    }
}

/// Checkpoints still unmet whose hour has not passed yet.
pub fn pending_reminders(glasses: u32, now_hour: u32) -> Vec<HydrationReminder> {
    REMINDER_SCHEDULE
        .iter()
        .filter(|r| glasses < r.target_glasses && r.hour > now_hour)
        .copied()
        .collect()
}
