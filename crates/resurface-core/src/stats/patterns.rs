//! Intention and time-of-day pattern analytics.

use std::collections::HashMap;

use serde::Serialize;

use super::round1;
use crate::clock::TimeOfDay;
use crate::model::{Snapshot, TimeOfDayMinutes};

/// How often one intention shows up in the log.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentionPattern {
    pub intention_id: String,
    pub count: u32,
    /// Share of all logged intentions, one decimal.
    pub percentage: f64,
    /// How often this intention ended in proceeding, as a [0, 1] fraction.
    pub proceed_rate: f64,
}

/// Intervention counts per time-of-day bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayCounts {
    pub morning: u32,
    pub daytime: u32,
    pub evening: u32,
    pub night: u32,
}

impl TimeOfDayCounts {
    fn add(&mut self, bucket: TimeOfDay) {
        match bucket {
            TimeOfDay::Morning => self.morning += 1,
            TimeOfDay::Daytime => self.daytime += 1,
            TimeOfDay::Evening => self.evening += 1,
            TimeOfDay::Night => self.night += 1,
        }
    }
}

/// Bucketed totals across intervention events and usage minutes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeOfDayPatterns {
    pub usage_minutes: TimeOfDayMinutes,
    pub interventions: TimeOfDayCounts,
}

/// Frequency and outcome per intention id, most frequent first.
pub fn intention_pattern_stats(snapshot: &Snapshot) -> Vec<IntentionPattern> {
    let total = snapshot.intention_history.len();
    if total == 0 {
        return Vec::new();
    }

    let mut counts: HashMap<&str, (u32, u32)> = HashMap::new();
    for entry in &snapshot.intention_history {
        let slot = counts.entry(entry.intention_id.as_str()).or_insert((0, 0));
        slot.0 += 1;
        if entry.proceeded {
            slot.1 += 1;
        }
    }

    let mut patterns: Vec<IntentionPattern> = counts
        .into_iter()
        .map(|(id, (count, proceeded))| IntentionPattern {
            intention_id: id.to_string(),
            count,
            percentage: round1(count as f64 / total as f64 * 100.0),
            proceed_rate: proceeded as f64 / count as f64,
        })
        .collect();
    patterns.sort_by(|a, b| b.count.cmp(&a.count).then(a.intention_id.cmp(&b.intention_id)));
    patterns
}

/// Time-of-day totals across the intervention history and all daily usage.
pub fn time_of_day_patterns(snapshot: &Snapshot) -> TimeOfDayPatterns {
    let mut patterns = TimeOfDayPatterns::default();

    for record in &snapshot.intervention_history {
        patterns.interventions.add(record.time_of_day);
    }
    for day in snapshot.daily_stats.values() {
        for bucket in TimeOfDay::all() {
            patterns
                .usage_minutes
                .add(bucket, day.time_of_day.get(bucket));
        }
    }

    patterns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IntentionLog, InterventionRecord};
    use chrono::Utc;

    fn intention(id: &str, proceeded: bool) -> IntentionLog {
        IntentionLog {
            id: format!("{}-{}", id, proceeded),
            timestamp: Utc::now(),
            intention_id: id.to_string(),
            proceeded,
            custom_text: None,
            app_package: None,
        }
    }

    #[test]
    fn test_intention_patterns_sorted_with_percentages() {
        let mut snapshot = Snapshot::default();
        for _ in 0..3 {
            snapshot.intention_history.push(intention("check-messages", false));
        }
        snapshot.intention_history.push(intention("boredom", true));

        let patterns = intention_pattern_stats(&snapshot);
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[0].intention_id, "check-messages");
        assert_eq!(patterns[0].count, 3);
        assert_eq!(patterns[0].percentage, 75.0);
        assert_eq!(patterns[0].proceed_rate, 0.0);
        assert_eq!(patterns[1].percentage, 25.0);
        assert_eq!(patterns[1].proceed_rate, 1.0);
    }

    #[test]
    fn test_empty_intention_log() {
        assert!(intention_pattern_stats(&Snapshot::default()).is_empty());
    }

    #[test]
    fn test_time_of_day_patterns_combine_sources() {
        let mut snapshot = Snapshot::default();
        snapshot.intervention_history.push(InterventionRecord {
            id: "a".into(),
            timestamp: Utc::now(),
            proceeded: false,
            kind: None,
            app_package: None,
            intensity_before: None,
            intensity_after: None,
            intention: None,
            time_of_day: TimeOfDay::Evening,
        });
        let day = snapshot.day_mut("2026-03-10");
        day.time_of_day.add(TimeOfDay::Evening, 12.0);
        day.time_of_day.add(TimeOfDay::Morning, 3.0);
        let day = snapshot.day_mut("2026-03-09");
        day.time_of_day.add(TimeOfDay::Evening, 8.0);

        let patterns = time_of_day_patterns(&snapshot);
        assert_eq!(patterns.interventions.evening, 1);
        assert_eq!(patterns.interventions.morning, 0);
        assert_eq!(patterns.usage_minutes.evening, 20.0);
        assert_eq!(patterns.usage_minutes.morning, 3.0);
    }
}
