//! Persisted data model for the habit tracker.
//!
//! These types serialize into the single JSON document the engine keeps
//! under its storage key. Field names stay camelCase on the wire so that
//! documents written by earlier builds of the app load unchanged.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::clock::TimeOfDay;

/// Storage key the whole snapshot is persisted under.
pub const STORAGE_KEY: &str = "habit_tracker_state";

/// Minutes credited to `total_saved_hours` per completed urge-surf session.
pub const SAVED_MINUTES_PER_SURF: f64 = 5.0;

/// Cap on the intervention history log.
pub const INTERVENTION_HISTORY_CAP: usize = 200;

/// Cap on the intention log.
pub const INTENTION_HISTORY_CAP: usize = 100;

/// Cap on the habit-score history.
pub const SCORE_HISTORY_CAP: usize = 30;

/// Initial habit score for a fresh snapshot.
pub const INITIAL_HABIT_SCORE: i32 = 50;

/// Per-day urge-surfing counters.
///
/// The intensity averages are running means, recomputed incrementally on
/// each completion; `completed` doubles as the sample count.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UrgeSurfingDay {
    pub completed: u32,
    pub skipped: u32,
    pub total_duration_seconds: f64,
    pub average_intensity_before: f64,
    pub average_intensity_after: f64,
}

/// Per-day intervention counters.
///
/// Invariant: `triggered == dismissed + proceeded`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct InterventionDay {
    pub triggered: u32,
    pub dismissed: u32,
    pub proceeded: u32,
}

/// Per-day training counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrainingDay {
    pub sessions_completed: u32,
    pub total_minutes: f64,
}

/// Usage minutes split by time-of-day bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeOfDayMinutes {
    pub morning: f64,
    pub daytime: f64,
    pub evening: f64,
    pub night: f64,
}

impl TimeOfDayMinutes {
    /// Add minutes to one bucket.
    pub fn add(&mut self, bucket: TimeOfDay, minutes: f64) {
        match bucket {
            TimeOfDay::Morning => self.morning += minutes,
            TimeOfDay::Daytime => self.daytime += minutes,
            TimeOfDay::Evening => self.evening += minutes,
            TimeOfDay::Night => self.night += minutes,
        }
    }

    /// Minutes in one bucket.
    pub fn get(&self, bucket: TimeOfDay) -> f64 {
        match bucket {
            TimeOfDay::Morning => self.morning,
            TimeOfDay::Daytime => self.daytime,
            TimeOfDay::Evening => self.evening,
            TimeOfDay::Night => self.night,
        }
    }
}

/// One calendar day of aggregated activity, keyed by `YYYY-MM-DD`.
///
/// `has_data` distinguishes "no events recorded" from "zero usage
/// recorded": the latter is a perfect day, not a missing one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DailyRecord {
    pub has_data: bool,
    pub total_usage_minutes: f64,
    pub app_breakdown: HashMap<String, f64>,
    pub urge_surfing: UrgeSurfingDay,
    pub interventions: InterventionDay,
    pub training: TrainingDay,
    pub time_of_day: TimeOfDayMinutes,
}

/// Declarative badge-unlock condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BadgeCondition {
    /// At least one completed urge-surf session.
    FirstSurf,
    /// Lifetime completed sessions reach `count`.
    TotalSurfs { count: u32 },
    /// Lifetime saved hours reach `hours`.
    SavedHours { hours: f64 },
    /// Monthly usage reduction reaches `percent`.
    Reduction { percent: f64 },
    /// Dismissed interventions reach `count`.
    InterventionSuccess { count: u32 },
    /// Habit score reaches `score`.
    HabitScore { score: i32 },
}

/// A one-way-earnable achievement.
///
/// `earned_at`, once set, is never cleared, even if the underlying
/// condition later becomes false.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Badge {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub condition: BadgeCondition,
    #[serde(default)]
    pub earned_at: Option<DateTime<Utc>>,
}

impl Badge {
    pub fn is_earned(&self) -> bool {
        self.earned_at.is_some()
    }
}

/// Lifetime rollup across all recorded days.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LifetimeRecord {
    /// Day key of the first tracked day.
    pub start_date: String,
    /// Derived additively: each completed surf adds a fixed 5 minutes.
    pub total_saved_hours: f64,
    pub total_urge_surfing_completed: u32,
    pub total_interventions: u32,
    pub current_streak: u32,
    /// Monotonic max of all observed streak values.
    pub longest_streak: u32,
    pub badges: Vec<Badge>,
}

/// One entry in the bounded intervention history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub proceeded: bool,
    /// Intervention flavor as presented by the UI (breathing, countdown, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub app_package: Option<String>,
    #[serde(default)]
    pub intensity_before: Option<f64>,
    #[serde(default)]
    pub intensity_after: Option<f64>,
    /// Intention the user picked at the choice point, if any.
    #[serde(default)]
    pub intention: Option<String>,
    pub time_of_day: TimeOfDay,
}

/// One entry in the bounded intention log. Analytics only; never feeds
/// streak or score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionLog {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub intention_id: String,
    pub proceeded: bool,
    #[serde(default)]
    pub custom_text: Option<String>,
    #[serde(default)]
    pub app_package: Option<String>,
}

/// One habit-score history point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Day key the score was set on.
    pub date: String,
    pub score: i32,
}

/// The entire persisted document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Snapshot {
    pub daily_stats: BTreeMap<String, DailyRecord>,
    pub lifetime: LifetimeRecord,
    pub intervention_history: Vec<InterventionRecord>,
    pub intention_history: Vec<IntentionLog>,
    pub habit_score: i32,
    pub habit_score_last_updated_date: Option<String>,
    pub habit_score_history: Vec<ScoreEntry>,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self {
            daily_stats: BTreeMap::new(),
            lifetime: LifetimeRecord::default(),
            intervention_history: Vec::new(),
            intention_history: Vec::new(),
            habit_score: INITIAL_HABIT_SCORE,
            habit_score_last_updated_date: None,
            habit_score_history: Vec::new(),
        }
    }
}

impl Snapshot {
    /// The day's record, creating an empty one on first write.
    pub fn day_mut(&mut self, key: &str) -> &mut DailyRecord {
        self.daily_stats.entry(key.to_string()).or_default()
    }

    /// The day's record, if any events were recorded for it.
    pub fn day(&self, key: &str) -> Option<&DailyRecord> {
        self.daily_stats.get(key)
    }
}

/// Append to a bounded log, silently dropping the oldest entries.
pub fn push_bounded<T>(log: &mut Vec<T>, entry: T, cap: usize) {
    log.push(entry);
    if log.len() > cap {
        let excess = log.len() - cap;
        log.drain(..excess);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_bounded_drops_oldest() {
        let mut log: Vec<u32> = Vec::new();
        for i in 0..250 {
            push_bounded(&mut log, i, 200);
        }
        assert_eq!(log.len(), 200);
        assert_eq!(log[0], 50);
        assert_eq!(log[199], 249);
    }

    #[test]
    fn test_snapshot_wire_format_is_camel_case() {
        let snapshot = Snapshot::default();
        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("dailyStats").is_some());
        assert!(json.get("habitScoreLastUpdatedDate").is_some());
        assert!(json.get("interventionHistory").is_some());
    }

    #[test]
    fn test_badge_condition_tagged_encoding() {
        let cond = BadgeCondition::TotalSurfs { count: 10 };
        let json = serde_json::to_value(&cond).unwrap();
        assert_eq!(json["type"], "total_surfs");
        assert_eq!(json["count"], 10);

        let first: BadgeCondition =
            serde_json::from_value(serde_json::json!({"type": "first_surf"})).unwrap();
        assert_eq!(first, BadgeCondition::FirstSurf);
    }

    #[test]
    fn test_daily_record_defaults_on_partial_document() {
        // Older documents may lack newer per-day sections
        let rec: DailyRecord = serde_json::from_str(
            r#"{"hasData": true, "totalUsageMinutes": 12.5}"#,
        )
        .unwrap();
        assert!(rec.has_data);
        assert_eq!(rec.total_usage_minutes, 12.5);
        assert_eq!(rec.training, TrainingDay::default());
    }

    #[test]
    fn test_day_mut_creates_lazily() {
        let mut snapshot = Snapshot::default();
        assert!(snapshot.day("2026-01-05").is_none());
        snapshot.day_mut("2026-01-05").has_data = true;
        assert!(snapshot.day("2026-01-05").unwrap().has_data);
    }
}
