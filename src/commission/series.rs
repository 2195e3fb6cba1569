use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use super::ViewMode;

/// Yearly totals keyed by calendar year
pub type YearlySeries = BTreeMap<i32, f64>;

pub const MONTHS_IN_YEAR: usize = 12;
pub const MAX_WEEKS: usize = 5;

const MONTH_NAMES: [&str; MONTHS_IN_YEAR] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One bar of the chart / one row of the breakdown table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub amount: f64,
}

/// Long month name for a 1-based month
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("Unknown")
}

/// Number of calendar rows the month spans when weeks start on Sunday, capped at 5.
/// Returns 0 for an invalid month.
pub fn weeks_in_month(year: i32, month: u32) -> usize {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return 0;
    };
    let offset = first.weekday().num_days_from_sunday() as usize;
    (offset + days_in_month(first)).div_ceil(7).min(MAX_WEEKS)
}

fn days_in_month(first: NaiveDate) -> usize {
    let next = if first.month() == 12 {
        NaiveDate::from_ymd_opt(first.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(first.year(), first.month() + 1, 1)
    };
    next.map(|n| (n - first).num_days() as usize).unwrap_or(31)
}

/// Pad or truncate to twelve months, missing entries as zero
pub fn normalize_monthly(values: &[Option<f64>]) -> Vec<f64> {
    (0..MONTHS_IN_YEAR)
        .map(|i| values.get(i).copied().flatten().unwrap_or(0.0))
        .collect()
}

/// Pad or truncate to the number of weeks the month spans
pub fn normalize_weekly(values: &[Option<f64>], year: i32, month: u32) -> Vec<f64> {
    (0..weeks_in_month(year, month))
        .map(|i| values.get(i).copied().flatten().unwrap_or(0.0))
        .collect()
}

/// Pick the one series the chart and breakdown table show for `view`.
///
/// Yearly points are labelled by `years`, with years missing from `yearly` as zero.
pub fn select_series(
    view: ViewMode,
    years: &[i32],
    yearly: &YearlySeries,
    monthly: &[f64],
    weekly: &[f64],
) -> Vec<SeriesPoint> {
    match view {
        ViewMode::Yearly => years
            .iter()
            .map(|year| SeriesPoint {
                label: year.to_string(),
                amount: yearly.get(year).copied().unwrap_or(0.0),
            })
            .collect(),
        ViewMode::Monthly => MONTH_NAMES
            .iter()
            .enumerate()
            .map(|(i, name)| SeriesPoint {
                label: name.to_string(),
                amount: monthly.get(i).copied().unwrap_or(0.0),
            })
            .collect(),
        ViewMode::Weekly => weekly
            .iter()
            .enumerate()
            .map(|(i, amount)| SeriesPoint {
                label: format!("Week {}", i + 1),
                amount: *amount,
            })
            .collect(),
    }
}
