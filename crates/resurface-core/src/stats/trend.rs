//! Monday-aligned weekly trend.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::range_totals;
use crate::clock::{format_day_key, monday_of_week};
use crate::model::Snapshot;

/// One Monday-aligned week in the trend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTrendPoint {
    /// Monday of the week.
    pub week_start: String,
    pub total_usage_minutes: f64,
    pub surfs_completed: u32,
    pub interventions_dismissed: u32,
    /// [0, 1] fraction.
    pub success_rate: f64,
}

/// The last 4 Monday-aligned weeks, oldest first; the final entry is the
/// (possibly partial) current week.
pub fn weekly_trend(snapshot: &Snapshot, today: NaiveDate) -> Vec<WeekTrendPoint> {
    let current_monday = monday_of_week(today);
    (0..4)
        .rev()
        .map(|weeks_back| {
            let start = current_monday - Duration::days(7 * weeks_back);
            let totals = range_totals(snapshot, start, start + Duration::days(6));
            WeekTrendPoint {
                week_start: format_day_key(start),
                total_usage_minutes: totals.usage_minutes,
                surfs_completed: totals.surfs_completed,
                interventions_dismissed: totals.dismissed,
                success_rate: totals.success_rate(),
            }
        })
        .collect()
}
