//! Calendar-day keys in the `dd/mm/yyyy` form the meal log stores.

use anyhow::{anyhow, Result};
use chrono::NaiveDate;

pub fn format(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Parse `dd/mm/yyyy`; single-digit day and month are accepted.
pub fn parse(key: &str) -> Result<NaiveDate> {
    let mut parts = key.trim().split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(anyhow!("day key {:?} is not dd/mm/yyyy", key));
    };

    let day: u32 = day
        .parse()
        .map_err(|_| anyhow!("invalid day in {:?}", key))?;
    let month: u32 = month
        .parse()
        .map_err(|_| anyhow!("invalid month in {:?}", key))?;
    let year: i32 = year
        .parse()
        .map_err(|_| anyhow!("invalid year in {:?}", key))?;

    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| anyhow!("day key {:?} is not a calendar date", key))
}

/// Two keys name the same day: equal dates when both parse, otherwise equal text.
pub fn same_day(a: &str, b: &str) -> bool {
    match (parse(a), parse(b)) {
        (Ok(x), Ok(y)) => x == y,
        _ => a.trim() == b.trim(),
    }
}
