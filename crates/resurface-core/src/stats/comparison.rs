//! Today/yesterday and this-week/last-week comparisons.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use super::{percent_change, range_totals};
use crate::model::Snapshot;

/// Delta between two equal-length periods.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current_usage_minutes: f64,
    pub previous_usage_minutes: f64,
    /// One decimal, 0 when the previous period is empty.
    pub usage_change_percent: f64,
    pub current_surfs_completed: u32,
    pub previous_surfs_completed: u32,
    pub current_dismissed: u32,
    pub previous_dismissed: u32,
}

fn compare(
    snapshot: &Snapshot,
    current: (NaiveDate, NaiveDate),
    previous: (NaiveDate, NaiveDate),
) -> PeriodComparison {
    let cur = range_totals(snapshot, current.0, current.1);
    let prev = range_totals(snapshot, previous.0, previous.1);
    PeriodComparison {
        current_usage_minutes: cur.usage_minutes,
        previous_usage_minutes: prev.usage_minutes,
        usage_change_percent: percent_change(cur.usage_minutes, prev.usage_minutes),
        current_surfs_completed: cur.surfs_completed,
        previous_surfs_completed: prev.surfs_completed,
        current_dismissed: cur.dismissed,
        previous_dismissed: prev.dismissed,
    }
}

/// Today vs yesterday.
pub fn daily_comparison(snapshot: &Snapshot, today: NaiveDate) -> PeriodComparison {
    let yesterday = today - Duration::days(1);
    compare(snapshot, (today, today), (yesterday, yesterday))
}

/// The 7 days ending today vs the 7 days before them.
pub fn weekly_comparison(snapshot: &Snapshot, today: NaiveDate) -> PeriodComparison {
    let week_start = today - Duration::days(6);
    compare(
        snapshot,
        (week_start, today),
        (week_start - Duration::days(7), today - Duration::days(7)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn put_day(snapshot: &mut Snapshot, key: &str, minutes: f64, surfs: u32, dismissed: u32) {
        let day = snapshot.day_mut(key);
        day.has_data = true;
        day.total_usage_minutes = minutes;
        day.urge_surfing.completed = surfs;
        day.interventions.dismissed = dismissed;
        day.interventions.triggered = dismissed;
    }

    #[test]
    fn test_daily_comparison() {
        let mut snapshot = Snapshot::default();
        put_day(&mut snapshot, "2026-03-10", 20.0, 2, 1);
        put_day(&mut snapshot, "2026-03-09", 40.0, 1, 3);

        let cmp = daily_comparison(&snapshot, date(2026, 3, 10));
        assert_eq!(cmp.current_usage_minutes, 20.0);
        assert_eq!(cmp.previous_usage_minutes, 40.0);
        assert_eq!(cmp.usage_change_percent, -50.0);
        assert_eq!(cmp.current_surfs_completed, 2);
        assert_eq!(cmp.previous_dismissed, 3);
    }

    #[test]
    fn test_daily_comparison_missing_yesterday() {
        let mut snapshot = Snapshot::default();
        put_day(&mut snapshot, "2026-03-10", 20.0, 0, 0);
        let cmp = daily_comparison(&snapshot, date(2026, 3, 10));
        assert_eq!(cmp.previous_usage_minutes, 0.0);
        assert_eq!(cmp.usage_change_percent, 0.0);
    }

    #[test]
    fn test_weekly_comparison_windows_do_not_overlap() {
        let mut snapshot = Snapshot::default();
        // Boundary days: 03-04 is in the current window, 03-03 in the previous
        put_day(&mut snapshot, "2026-03-04", 10.0, 0, 0);
        put_day(&mut snapshot, "2026-03-03", 99.0, 0, 0);

        let cmp = weekly_comparison(&snapshot, date(2026, 3, 10));
        assert_eq!(cmp.current_usage_minutes, 10.0);
        assert_eq!(cmp.previous_usage_minutes, 99.0);
    }
}
