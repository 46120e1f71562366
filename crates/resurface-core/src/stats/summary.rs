//! Day, week, and month summaries.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use super::{percent_change, range_totals, round1};
use crate::clock::{format_day_key, DayClock};
use crate::model::{Snapshot, TimeOfDayMinutes};

/// Today's activity at a glance.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayStats {
    pub date: String,
    pub has_data: bool,
    pub total_usage_minutes: f64,
    pub surfs_completed: u32,
    pub surfs_skipped: u32,
    pub interventions_triggered: u32,
    pub interventions_dismissed: u32,
    pub interventions_proceeded: u32,
    /// [0, 1] fraction, 0 when nothing was triggered.
    pub intervention_success_rate: f64,
    pub training_sessions: u32,
    pub training_minutes: f64,
    pub time_of_day: TimeOfDayMinutes,
}

/// Current 7-day window with deltas against the prior week.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyStats {
    pub week_start: String,
    pub week_end: String,
    pub total_usage_minutes: f64,
    pub daily_average_minutes: f64,
    pub surfs_completed: u32,
    pub interventions_triggered: u32,
    pub interventions_dismissed: u32,
    /// [0, 1] fraction.
    pub success_rate: f64,
    pub active_days: u32,
    /// Percent deltas vs the prior 7 days, one decimal, 0 when the prior
    /// week is empty.
    pub usage_change_percent: f64,
    pub surf_change_percent: f64,
    pub intervention_change_percent: f64,
}

/// Calendar-month achievement rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyAchievementStats {
    /// `YYYY-MM`.
    pub month: String,
    pub active_days: u32,
    /// Days with data at or under the daily goal (or rescued by a surf).
    pub goal_met_days: u32,
    pub surfs_completed: u32,
    pub total_usage_minutes: f64,
    pub average_daily_minutes: f64,
    /// goal_met_days over active_days as a [0, 1] fraction.
    pub achievement_rate: f64,
}

/// Today's record as a display summary; a missing day is a valid empty day.
pub fn today_stats(snapshot: &Snapshot, clock: &DayClock) -> DayStats {
    let date = clock.today_key();
    let day = snapshot.day(&date).cloned().unwrap_or_default();
    let success_rate = if day.interventions.triggered > 0 {
        day.interventions.dismissed as f64 / day.interventions.triggered as f64
    } else {
        0.0
    };
    DayStats {
        date,
        has_data: day.has_data,
        total_usage_minutes: day.total_usage_minutes,
        surfs_completed: day.urge_surfing.completed,
        surfs_skipped: day.urge_surfing.skipped,
        interventions_triggered: day.interventions.triggered,
        interventions_dismissed: day.interventions.dismissed,
        interventions_proceeded: day.interventions.proceeded,
        intervention_success_rate: success_rate,
        training_sessions: day.training.sessions_completed,
        training_minutes: day.training.total_minutes,
        time_of_day: day.time_of_day,
    }
}

/// The current 7-day window (ending today) with prior-week deltas.
pub fn weekly_stats(snapshot: &Snapshot, today: NaiveDate) -> WeeklyStats {
    let week_start = today - Duration::days(6);
    let current = range_totals(snapshot, week_start, today);
    let previous = range_totals(
        snapshot,
        week_start - Duration::days(7),
        today - Duration::days(7),
    );

    WeeklyStats {
        week_start: format_day_key(week_start),
        week_end: format_day_key(today),
        total_usage_minutes: current.usage_minutes,
        daily_average_minutes: round1(current.usage_minutes / 7.0),
        surfs_completed: current.surfs_completed,
        interventions_triggered: current.triggered,
        interventions_dismissed: current.dismissed,
        success_rate: current.success_rate(),
        active_days: current.active_days,
        usage_change_percent: percent_change(current.usage_minutes, previous.usage_minutes),
        surf_change_percent: percent_change(
            current.surfs_completed as f64,
            previous.surfs_completed as f64,
        ),
        intervention_change_percent: percent_change(
            current.triggered as f64,
            previous.triggered as f64,
        ),
    }
}

/// Rollup of the current calendar month, up to today.
pub fn monthly_achievement_stats(
    snapshot: &Snapshot,
    today: NaiveDate,
    daily_goal_minutes: f64,
) -> MonthlyAchievementStats {
    let month_start = today.with_day(1).expect("day 1 is always valid");
    let totals = range_totals(snapshot, month_start, today);

    let mut goal_met_days = 0;
    let mut cursor = month_start;
    while cursor <= today {
        if let Some(day) = snapshot.day(&format_day_key(cursor)) {
            if day.has_data
                && (day.urge_surfing.completed > 0
                    || day.total_usage_minutes <= daily_goal_minutes)
            {
                goal_met_days += 1;
            }
        }
        cursor += Duration::days(1);
    }

    let average_daily_minutes = if totals.active_days > 0 {
        round1(totals.usage_minutes / totals.active_days as f64)
    } else {
        0.0
    };
    let achievement_rate = if totals.active_days > 0 {
        goal_met_days as f64 / totals.active_days as f64
    } else {
        0.0
    };

    MonthlyAchievementStats {
        month: today.format("%Y-%m").to_string(),
        active_days: totals.active_days,
        goal_met_days,
        surfs_completed: totals.surfs_completed,
        total_usage_minutes: totals.usage_minutes,
        average_daily_minutes,
        achievement_rate,
    }
}

/// Percent reduction of the current month's average daily usage against an
/// externally supplied baseline. Positive means usage went down; one
/// decimal; 0 when the baseline is not positive.
pub fn reduction_rate(snapshot: &Snapshot, today: NaiveDate, baseline_daily_minutes: f64) -> f64 {
    if baseline_daily_minutes <= 0.0 {
        return 0.0;
    }
    let monthly = monthly_achievement_stats(snapshot, today, f64::MAX);
    round1(
        (baseline_daily_minutes - monthly.average_daily_minutes) / baseline_daily_minutes * 100.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Snapshot;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn put_day(snapshot: &mut Snapshot, key: &str, minutes: f64, surfs: u32) {
        let day = snapshot.day_mut(key);
        day.has_data = true;
        day.total_usage_minutes = minutes;
        day.urge_surfing.completed = surfs;
    }

    #[test]
    fn test_today_stats_on_empty_snapshot() {
        let snapshot = Snapshot::default();
        let stats = today_stats(&snapshot, &DayClock::utc());
        assert!(!stats.has_data);
        assert_eq!(stats.total_usage_minutes, 0.0);
        assert_eq!(stats.intervention_success_rate, 0.0);
    }

    #[test]
    fn test_weekly_stats_deltas() {
        let mut snapshot = Snapshot::default();
        // This week: 70 minutes; last week: 140 minutes -> -50%
        put_day(&mut snapshot, "2026-03-10", 70.0, 2);
        put_day(&mut snapshot, "2026-03-01", 140.0, 1);

        let stats = weekly_stats(&snapshot, date(2026, 3, 10));
        assert_eq!(stats.week_start, "2026-03-04");
        assert_eq!(stats.total_usage_minutes, 70.0);
        assert_eq!(stats.usage_change_percent, -50.0);
        assert_eq!(stats.surf_change_percent, 100.0);
        assert_eq!(stats.daily_average_minutes, 10.0);
    }

    #[test]
    fn test_weekly_stats_empty_prior_week_guards_to_zero() {
        let mut snapshot = Snapshot::default();
        put_day(&mut snapshot, "2026-03-10", 70.0, 0);
        let stats = weekly_stats(&snapshot, date(2026, 3, 10));
        assert_eq!(stats.usage_change_percent, 0.0);
    }

    #[test]
    fn test_monthly_achievement() {
        let mut snapshot = Snapshot::default();
        put_day(&mut snapshot, "2026-03-02", 10.0, 0); // under goal
        put_day(&mut snapshot, "2026-03-03", 90.0, 1); // rescued by surf
        put_day(&mut snapshot, "2026-03-04", 90.0, 0); // over goal
        put_day(&mut snapshot, "2026-02-27", 5.0, 0); // prior month, ignored

        let stats = monthly_achievement_stats(&snapshot, date(2026, 3, 10), 30.0);
        assert_eq!(stats.month, "2026-03");
        assert_eq!(stats.active_days, 3);
        assert_eq!(stats.goal_met_days, 2);
        assert!((stats.achievement_rate - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(stats.total_usage_minutes, 190.0);
    }

    #[test]
    fn test_reduction_rate() {
        let mut snapshot = Snapshot::default();
        put_day(&mut snapshot, "2026-03-02", 30.0, 0);
        put_day(&mut snapshot, "2026-03-03", 30.0, 0);

        // Baseline 60 min/day, current average 30 -> 50% reduction
        assert_eq!(reduction_rate(&snapshot, date(2026, 3, 10), 60.0), 50.0);
        // Usage above baseline -> negative reduction
        assert_eq!(reduction_rate(&snapshot, date(2026, 3, 10), 20.0), -50.0);
        // Guarded baseline
        assert_eq!(reduction_rate(&snapshot, date(2026, 3, 10), 0.0), 0.0);
    }
}
