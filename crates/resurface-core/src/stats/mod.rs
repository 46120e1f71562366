//! Read-only derived views over the aggregation store.
//!
//! Everything here is computed on demand from the snapshot; there is no
//! caching and no invalidation, since the store is append/merge-only.
//! Percentage outputs are rounded to one decimal; success rates are
//! [0, 1] fractions.

mod comparison;
mod patterns;
mod summary;
mod trend;

pub use comparison::{daily_comparison, weekly_comparison, PeriodComparison};
pub use patterns::{
    intention_pattern_stats, time_of_day_patterns, IntentionPattern, TimeOfDayCounts,
    TimeOfDayPatterns,
};
pub use summary::{
    monthly_achievement_stats, reduction_rate, today_stats, weekly_stats, DayStats,
    MonthlyAchievementStats, WeeklyStats,
};
pub use trend::{weekly_trend, WeekTrendPoint};

use chrono::{Duration, NaiveDate};

use crate::clock::format_day_key;
use crate::model::Snapshot;

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Percent change from `previous` to `current`, one decimal,
/// divide-by-zero guarded to 0.
pub(crate) fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        0.0
    } else {
        round1((current - previous) / previous * 100.0)
    }
}

/// Totals over an inclusive day range.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct RangeTotals {
    pub usage_minutes: f64,
    pub surfs_completed: u32,
    pub triggered: u32,
    pub dismissed: u32,
    /// Days in the range with recorded data.
    pub active_days: u32,
}

impl RangeTotals {
    /// Dismissed over triggered as a [0, 1] fraction, 0 when empty.
    pub fn success_rate(&self) -> f64 {
        if self.triggered > 0 {
            self.dismissed as f64 / self.triggered as f64
        } else {
            0.0
        }
    }
}

/// Sum the days in `[start, end]`, treating missing days as empty.
pub(crate) fn range_totals(snapshot: &Snapshot, start: NaiveDate, end: NaiveDate) -> RangeTotals {
    let mut totals = RangeTotals::default();
    let mut cursor = start;
    while cursor <= end {
        if let Some(day) = snapshot.day(&format_day_key(cursor)) {
            totals.usage_minutes += day.total_usage_minutes;
            totals.surfs_completed += day.urge_surfing.completed;
            totals.triggered += day.interventions.triggered;
            totals.dismissed += day.interventions.dismissed;
            if day.has_data {
                totals.active_days += 1;
            }
        }
        cursor += Duration::days(1);
    }
    totals
}
