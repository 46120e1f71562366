//! One-time migration from the legacy monolithic document.
//!
//! Earlier builds persisted a flat document: a `days` map with loose
//! per-day counters, a flat `lifetime` block, and a bare `score`. No
//! bounded histories, no score history, no badges. This module reshapes
//! such documents into the canonical [`Snapshot`]; fields the legacy
//! shape never carried start at their zero values.
//!
//! Detection is key-based: the canonical shape is recognized by its
//! `dailyStats`/`lifetime` keys, the legacy shape by `days`/`score`.
//! Anything else is treated as unreadable and the engine starts fresh.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::model::{
    DailyRecord, InterventionDay, LifetimeRecord, ScoreEntry, Snapshot, TrainingDay,
    UrgeSurfingDay, INITIAL_HABIT_SCORE, SCORE_HISTORY_CAP,
};

/// Outcome of loading a persisted document.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadedDocument {
    /// Document was already in the canonical shape.
    Canonical(Snapshot),
    /// Document was in the legacy shape and has been migrated.
    Migrated(Snapshot),
    /// Document could not be recognized; caller should start fresh.
    Unrecognized,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyDay {
    usage_minutes: f64,
    app_minutes: std::collections::HashMap<String, f64>,
    surfs_completed: u32,
    surfs_skipped: u32,
    surf_seconds: f64,
    interventions_triggered: u32,
    interventions_dismissed: u32,
    interventions_proceeded: u32,
    training_sessions: u32,
    training_minutes: f64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacyLifetime {
    since: String,
    saved_hours: f64,
    surfs_completed: u32,
    interventions: u32,
    streak: u32,
    longest_streak: u32,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct LegacySnapshot {
    days: BTreeMap<String, LegacyDay>,
    lifetime: LegacyLifetime,
    score: Option<i32>,
    score_updated: Option<String>,
}

/// Parse a persisted document, migrating the legacy shape if needed.
pub fn load_document(raw: &str) -> LoadedDocument {
    let value: Value = match serde_json::from_str(raw) {
        Ok(v) => v,
        Err(e) => {
            log::warn!("persisted document is not valid JSON: {e}");
            return LoadedDocument::Unrecognized;
        }
    };

    let Some(obj) = value.as_object() else {
        log::warn!("persisted document is not a JSON object");
        return LoadedDocument::Unrecognized;
    };

    if obj.contains_key("dailyStats")
        || obj.contains_key("interventionHistory")
        || obj.contains_key("habitScoreHistory")
    {
        match serde_json::from_value::<Snapshot>(value) {
            Ok(snapshot) => LoadedDocument::Canonical(snapshot),
            Err(e) => {
                log::warn!("canonical document failed to parse: {e}");
                LoadedDocument::Unrecognized
            }
        }
    } else if obj.contains_key("days") || obj.contains_key("score") {
        match serde_json::from_value::<LegacySnapshot>(value) {
            Ok(legacy) => {
                log::info!("migrating legacy document ({} days)", legacy.days.len());
                LoadedDocument::Migrated(migrate_legacy(legacy))
            }
            Err(e) => {
                log::warn!("legacy document failed to parse: {e}");
                LoadedDocument::Unrecognized
            }
        }
    } else {
        log::warn!("persisted document matches no known shape");
        LoadedDocument::Unrecognized
    }
}

fn migrate_legacy(legacy: LegacySnapshot) -> Snapshot {
    let daily_stats: BTreeMap<String, DailyRecord> = legacy
        .days
        .into_iter()
        .map(|(key, day)| (key, migrate_day(day)))
        .collect();

    let score = legacy.score.unwrap_or(INITIAL_HABIT_SCORE).clamp(0, 100);
    // Seed the history with the carried-over point so trend views have an
    // anchor; the legacy shape kept no history to migrate.
    let history = match &legacy.score_updated {
        Some(date) => vec![ScoreEntry {
            date: date.clone(),
            score,
        }],
        None => Vec::new(),
    };
    debug_assert!(history.len() <= SCORE_HISTORY_CAP);

    Snapshot {
        daily_stats,
        lifetime: LifetimeRecord {
            start_date: legacy.lifetime.since,
            total_saved_hours: legacy.lifetime.saved_hours,
            total_urge_surfing_completed: legacy.lifetime.surfs_completed,
            total_interventions: legacy.lifetime.interventions,
            current_streak: legacy.lifetime.streak,
            longest_streak: legacy.lifetime.longest_streak.max(legacy.lifetime.streak),
            // Badges postdate the legacy shape; the catalog is merged in
            // unearned by the tracker on load.
            badges: Vec::new(),
        },
        intervention_history: Vec::new(),
        intention_history: Vec::new(),
        habit_score: score,
        habit_score_last_updated_date: legacy.score_updated,
        habit_score_history: history,
    }
}

fn migrate_day(day: LegacyDay) -> DailyRecord {
    // The legacy writer only created a day entry when something happened,
    // so every migrated day is a data day.
    DailyRecord {
        has_data: true,
        total_usage_minutes: day.usage_minutes,
        app_breakdown: day.app_minutes,
        urge_surfing: UrgeSurfingDay {
            completed: day.surfs_completed,
            skipped: day.surfs_skipped,
            total_duration_seconds: day.surf_seconds,
            // Intensity means were not tracked in the legacy shape.
            average_intensity_before: 0.0,
            average_intensity_after: 0.0,
        },
        interventions: InterventionDay {
            triggered: day.interventions_triggered,
            dismissed: day.interventions_dismissed,
            proceeded: day.interventions_proceeded,
        },
        training: TrainingDay {
            sessions_completed: day.training_sessions,
            total_minutes: day.training_minutes,
        },
        time_of_day: Default::default(),
    }
}
