//! Day-streak calculation.
//!
//! A streak is the count of consecutive successful calendar days ending
//! today. A day succeeds if the user completed at least one urge-surf
//! session or kept total usage at or under the daily goal.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::clock::{format_day_key, previous_day};
use crate::model::DailyRecord;

/// Safety cap on the backward walk, against corrupted day maps.
const MAX_STREAK_ITERATIONS: u32 = 1000;

/// Default daily usage goal in minutes.
pub const DEFAULT_DAILY_GOAL_MINUTES: f64 = 30.0;

/// Whether a single day counts toward the streak.
///
/// A record with `has_data == false` is equivalent to a missing day.
fn day_successful(record: &DailyRecord, daily_goal_minutes: f64) -> bool {
    record.has_data
        && (record.urge_surfing.completed > 0
            || record.total_usage_minutes <= daily_goal_minutes)
}

/// Count consecutive successful days ending at `today`.
///
/// Walks backward day-by-day; the first missing or unsuccessful day ends
/// the streak. A day with a record of zero usage is a perfect day, not a
/// missing one.
pub fn calculate_streak(
    daily_stats: &BTreeMap<String, DailyRecord>,
    today: NaiveDate,
    daily_goal_minutes: f64,
) -> u32 {
    let mut streak = 0;
    let mut cursor = today;

    while streak < MAX_STREAK_ITERATIONS {
        match daily_stats.get(&format_day_key(cursor)) {
            Some(record) if day_successful(record, daily_goal_minutes) => {
                streak += 1;
                cursor = previous_day(cursor);
            }
            _ => break,
        }
    }

    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UrgeSurfingDay;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn usage_day(minutes: f64) -> DailyRecord {
        DailyRecord {
            has_data: true,
            total_usage_minutes: minutes,
            ..Default::default()
        }
    }

    fn surf_day() -> DailyRecord {
        DailyRecord {
            has_data: true,
            total_usage_minutes: 120.0,
            urge_surfing: UrgeSurfingDay {
                completed: 1,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_map_gives_zero() {
        let daily = BTreeMap::new();
        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 0);
    }

    #[test]
    fn test_counts_consecutive_days_until_break() {
        let mut daily = BTreeMap::new();
        daily.insert("2026-03-10".into(), usage_day(10.0));
        daily.insert("2026-03-09".into(), surf_day());
        daily.insert("2026-03-08".into(), usage_day(25.0));
        // 03-07 over goal with no surf: streak stops here
        daily.insert("2026-03-07".into(), usage_day(90.0));
        daily.insert("2026-03-06".into(), usage_day(5.0));

        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 3);
    }

    #[test]
    fn test_missing_day_breaks_streak() {
        let mut daily = BTreeMap::new();
        daily.insert("2026-03-10".into(), usage_day(10.0));
        // 03-09 missing
        daily.insert("2026-03-08".into(), usage_day(10.0));

        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 1);
    }

    #[test]
    fn test_today_missing_gives_zero() {
        let mut daily = BTreeMap::new();
        daily.insert("2026-03-09".into(), usage_day(10.0));
        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 0);
    }

    #[test]
    fn test_surf_rescues_over_goal_day() {
        let mut daily = BTreeMap::new();
        daily.insert("2026-03-10".into(), surf_day());
        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 1);
    }

    #[test]
    fn test_usage_exactly_at_goal_succeeds() {
        let mut daily = BTreeMap::new();
        daily.insert("2026-03-10".into(), usage_day(30.0));
        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 1);
    }

    #[test]
    fn test_iteration_cap() {
        // Every day back from today succeeds; the cap bounds the walk
        let mut daily = BTreeMap::new();
        let mut cursor = date(2026, 3, 10);
        for _ in 0..1500 {
            daily.insert(format_day_key(cursor), usage_day(0.0));
            cursor = previous_day(cursor);
        }
        assert_eq!(calculate_streak(&daily, date(2026, 3, 10), 30.0), 1000);
    }
}
