//! Hysteresis habit score.
//!
//! A bounded [0, 100] reputation metric updated at most once per calendar
//! day: the first update of a day compares yesterday's usage against the
//! goal and moves the score by +10 (good day) or -3 (bad day). Recovery
//! from a bad day is slower than reward for a good day on purpose.

use chrono::NaiveDate;

use crate::clock::{format_day_key, previous_day};
use crate::model::{push_bounded, ScoreEntry, Snapshot, SCORE_HISTORY_CAP};

/// Score floor and ceiling.
pub const SCORE_MIN: i32 = 0;
pub const SCORE_MAX: i32 = 100;

/// Step applied for a day at or under the goal.
const GOOD_DAY_STEP: i32 = 10;
/// Step applied for a day over the goal.
const BAD_DAY_STEP: i32 = 3;

/// What a score update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreUpdate {
    /// Already evaluated today; nothing changed.
    AlreadyUpdated,
    /// Yesterday had no data; today marked evaluated, score untouched.
    NoData,
    /// Score moved (or pinned at a bound) based on yesterday's usage.
    Applied { previous: i32, current: i32 },
}

/// Apply the once-per-day score update to the snapshot.
///
/// `selected_packages`, when non-empty, restricts the evaluated usage to
/// those apps' share of yesterday's breakdown.
pub fn update_habit_score(
    snapshot: &mut Snapshot,
    today: NaiveDate,
    daily_goal_minutes: f64,
    selected_packages: Option<&[String]>,
) -> ScoreUpdate {
    let today_key = format_day_key(today);

    // Date gate: at most one adjustment per calendar day, no matter how
    // often callers invoke this.
    if snapshot.habit_score_last_updated_date.as_deref() == Some(today_key.as_str()) {
        return ScoreUpdate::AlreadyUpdated;
    }

    let yesterday_key = format_day_key(previous_day(today));
    let yesterday = snapshot.day(&yesterday_key);

    let usage = match yesterday {
        Some(record) if record.has_data => evaluated_usage(record, selected_packages),
        // No penalty for missing data; mark today evaluated and move on.
        _ => {
            snapshot.habit_score_last_updated_date = Some(today_key);
            return ScoreUpdate::NoData;
        }
    };

    let previous = snapshot.habit_score;
    let current = if usage <= daily_goal_minutes {
        (previous + GOOD_DAY_STEP).min(SCORE_MAX)
    } else {
        (previous - BAD_DAY_STEP).max(SCORE_MIN)
    };

    snapshot.habit_score = current;
    push_bounded(
        &mut snapshot.habit_score_history,
        ScoreEntry {
            date: today_key.clone(),
            score: current,
        },
        SCORE_HISTORY_CAP,
    );
    snapshot.habit_score_last_updated_date = Some(today_key);

    log::debug!("habit score {previous} -> {current} (yesterday usage {usage:.1} min)");
    ScoreUpdate::Applied { previous, current }
}

fn evaluated_usage(
    record: &crate::model::DailyRecord,
    selected_packages: Option<&[String]>,
) -> f64 {
    match selected_packages {
        Some(packages) if !packages.is_empty() => packages
            .iter()
            .filter_map(|p| record.app_breakdown.get(p))
            .sum(),
        _ => record.total_usage_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn snapshot_with_yesterday(minutes: f64) -> Snapshot {
        let mut snapshot = Snapshot::default();
        let day = snapshot.day_mut("2026-03-09");
        day.has_data = true;
        day.total_usage_minutes = minutes;
        snapshot
    }

    #[test]
    fn test_good_day_then_bad_day() {
        // 50 -> 60 (10 min vs goal 30), then 60 -> 57 the next day
        let mut snapshot = snapshot_with_yesterday(10.0);
        let update = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(
            update,
            ScoreUpdate::Applied {
                previous: 50,
                current: 60
            }
        );

        let day = snapshot.day_mut("2026-03-10");
        day.has_data = true;
        day.total_usage_minutes = 50.0;
        let update = update_habit_score(&mut snapshot, date(2026, 3, 11), 30.0, None);
        assert_eq!(
            update,
            ScoreUpdate::Applied {
                previous: 60,
                current: 57
            }
        );
    }

    #[test]
    fn test_idempotent_within_day() {
        let mut snapshot = snapshot_with_yesterday(10.0);
        update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(snapshot.habit_score, 60);

        let second = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(second, ScoreUpdate::AlreadyUpdated);
        assert_eq!(snapshot.habit_score, 60);
        assert_eq!(snapshot.habit_score_history.len(), 1);
    }

    #[test]
    fn test_missing_yesterday_marks_evaluated_without_change() {
        let mut snapshot = Snapshot::default();
        let update = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(update, ScoreUpdate::NoData);
        assert_eq!(snapshot.habit_score, 50);
        assert!(snapshot.habit_score_history.is_empty());

        // The gate still holds for the rest of the day
        let second = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(second, ScoreUpdate::AlreadyUpdated);
    }

    #[test]
    fn test_yesterday_without_data_flag_is_skipped() {
        let mut snapshot = Snapshot::default();
        snapshot.day_mut("2026-03-09").total_usage_minutes = 500.0;
        let update = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(update, ScoreUpdate::NoData);
        assert_eq!(snapshot.habit_score, 50);
    }

    #[test]
    fn test_clamped_at_bounds() {
        let mut snapshot = snapshot_with_yesterday(5.0);
        snapshot.habit_score = 95;
        update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(snapshot.habit_score, 100);

        let mut snapshot = snapshot_with_yesterday(300.0);
        snapshot.habit_score = 2;
        update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(snapshot.habit_score, 0);
    }

    #[test]
    fn test_selected_packages_restrict_usage() {
        let mut snapshot = Snapshot::default();
        let day = snapshot.day_mut("2026-03-09");
        day.has_data = true;
        day.total_usage_minutes = 200.0;
        day.app_breakdown.insert("com.example.feed".into(), 20.0);
        day.app_breakdown.insert("com.example.mail".into(), 180.0);

        // Only the tracked feed app counts: 20 <= 30, good day
        let tracked = vec!["com.example.feed".to_string()];
        let update = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, Some(&tracked));
        assert_eq!(
            update,
            ScoreUpdate::Applied {
                previous: 50,
                current: 60
            }
        );
    }

    #[test]
    fn test_history_is_bounded() {
        let mut snapshot = Snapshot::default();
        let mut day = date(2026, 1, 1);
        for _ in 0..40 {
            let key = format_day_key(day);
            let record = snapshot.day_mut(&key);
            record.has_data = true;
            record.total_usage_minutes = 10.0;
            day = day + chrono::Duration::days(1);
            update_habit_score(&mut snapshot, day, 30.0, None);
        }
        assert_eq!(snapshot.habit_score_history.len(), SCORE_HISTORY_CAP);
        // Most recent entries are kept
        let last = snapshot.habit_score_history.last().unwrap();
        assert_eq!(last.date, format_day_key(day));
    }

    #[test]
    fn test_zero_usage_day_is_a_good_day() {
        let mut snapshot = Snapshot::default();
        let day = snapshot.day_mut("2026-03-09");
        day.has_data = true;
        day.total_usage_minutes = 0.0;
        let update = update_habit_score(&mut snapshot, date(2026, 3, 10), 30.0, None);
        assert_eq!(
            update,
            ScoreUpdate::Applied {
                previous: 50,
                current: 60
            }
        );
    }
}
