//! The aggregation store and its recording API.
//!
//! [`HabitTracker`] owns the entire mutable state of the engine: the
//! per-day records, the lifetime rollup, the bounded event logs, and the
//! habit score. Every mutation is a synchronous read-modify-write over the
//! owned snapshot followed by a best-effort persist; in-memory state is
//! the source of truth and a write failure loses at most one mutation.
//!
//! All calls are expected on one logical thread (`&mut self` enforces
//! exclusivity); there is no partial visibility of an in-progress update.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::badges::{self, BadgeContext};
use crate::clock::DayClock;
use crate::model::{
    push_bounded, IntentionLog, InterventionRecord, Snapshot, INTENTION_HISTORY_CAP,
    INTERVENTION_HISTORY_CAP, SAVED_MINUTES_PER_SURF, STORAGE_KEY,
};
use crate::score::{self, ScoreUpdate};
use crate::stats;
use crate::storage::{EngineConfig, StorageProvider};
use crate::streak::calculate_streak;

/// Outcome of one urge-surfing session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UrgeSurfOutcome {
    /// Self-reported urge intensity before the session (caller-validated).
    pub intensity_before: f64,
    /// Self-reported urge intensity after the session.
    pub intensity_after: f64,
    pub duration_seconds: f64,
    /// Completed vs skipped; the session's two terminal outcomes.
    pub completed: bool,
}

/// One intervention choice point, as reported by the UI.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InterventionEvent {
    /// True if the user continued to the blocked app; false means resisted.
    pub proceeded: bool,
    /// Intervention flavor (breathing, countdown, ...).
    pub kind: Option<String>,
    pub app_package: Option<String>,
    /// Defaults to now when absent.
    pub timestamp: Option<DateTime<Utc>>,
    pub intensity_before: Option<f64>,
    pub intensity_after: Option<f64>,
    /// Intention the user picked at the choice point.
    pub intention: Option<String>,
}

/// Summed intervention outcomes across all recorded days.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InterventionSuccessRate {
    pub triggered: u32,
    pub dismissed: u32,
    pub proceeded: u32,
    /// [0, 1] fraction; 0 when nothing was triggered.
    pub success_rate: f64,
}

/// The habit statistics and gamification engine.
pub struct HabitTracker {
    snapshot: Snapshot,
    clock: DayClock,
    store: Box<dyn StorageProvider>,
    config: EngineConfig,
}

impl HabitTracker {
    /// Restore the engine from the provider, or start at the zero state.
    ///
    /// Legacy-shaped documents are migrated and written back once;
    /// unrecognizable documents are discarded with a warning.
    pub fn new(store: Box<dyn StorageProvider>, config: EngineConfig) -> Self {
        let clock = DayClock::from_offset_minutes(config.utc_offset_minutes);

        let raw = match store.get(STORAGE_KEY) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("failed to read persisted state: {e}");
                None
            }
        };

        let (snapshot, migrated) = match raw {
            Some(raw) => match crate::storage::migrate::load_document(&raw) {
                crate::storage::migrate::LoadedDocument::Canonical(s) => (s, false),
                crate::storage::migrate::LoadedDocument::Migrated(s) => (s, true),
                crate::storage::migrate::LoadedDocument::Unrecognized => {
                    (Snapshot::default(), false)
                }
            },
            None => (Snapshot::default(), false),
        };

        let mut tracker = Self {
            snapshot,
            clock,
            store,
            config,
        };

        badges::merge_catalog(&mut tracker.snapshot.lifetime.badges);
        if tracker.snapshot.lifetime.start_date.is_empty() {
            tracker.snapshot.lifetime.start_date = tracker.clock.today_key();
        }
        if migrated {
            tracker.persist();
        }
        tracker
    }

    /// Read-only view of the full state.
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &DayClock {
        &self.clock
    }

    // ------------------------------------------------------------------
    // Recording API
    // ------------------------------------------------------------------

    /// Record one urge-surfing session.
    ///
    /// A completed session updates today's counters and the running
    /// intensity means, and credits the lifetime rollup. Streak and badges
    /// are re-evaluated on either outcome, since the streak also depends
    /// on usage totals.
    pub fn record_urge_surfing(&mut self, outcome: UrgeSurfOutcome) {
        let today = self.clock.today_key();
        let day = self.snapshot.day_mut(&today);
        day.has_data = true;

        if outcome.completed {
            let surf = &mut day.urge_surfing;
            surf.completed += 1;
            surf.total_duration_seconds += outcome.duration_seconds;
            // Incremental mean with n the post-increment count
            let n = surf.completed as f64;
            surf.average_intensity_before =
                (surf.average_intensity_before * (n - 1.0) + outcome.intensity_before) / n;
            surf.average_intensity_after =
                (surf.average_intensity_after * (n - 1.0) + outcome.intensity_after) / n;

            self.snapshot.lifetime.total_urge_surfing_completed += 1;
            self.snapshot.lifetime.total_saved_hours += SAVED_MINUTES_PER_SURF / 60.0;
        } else {
            day.urge_surfing.skipped += 1;
        }

        self.refresh_streak();
        let context = self.badge_context(None);
        self.check_badges(&context);
        log::debug!(
            "urge surf recorded (completed: {}), streak {}",
            outcome.completed,
            self.snapshot.lifetime.current_streak
        );
        self.persist();
    }

    /// Record one intervention choice point.
    pub fn record_intervention(&mut self, event: InterventionEvent) {
        let timestamp = event.timestamp.unwrap_or_else(|| self.clock.now());
        let time_of_day = self.clock.time_of_day(timestamp);
        let day_key = self.clock.day_key(timestamp);

        push_bounded(
            &mut self.snapshot.intervention_history,
            InterventionRecord {
                id: Uuid::new_v4().to_string(),
                timestamp,
                proceeded: event.proceeded,
                kind: event.kind,
                app_package: event.app_package,
                intensity_before: event.intensity_before,
                intensity_after: event.intensity_after,
                intention: event.intention,
                time_of_day,
            },
            INTERVENTION_HISTORY_CAP,
        );

        let day = self.snapshot.day_mut(&day_key);
        day.has_data = true;
        day.interventions.triggered += 1;
        if event.proceeded {
            day.interventions.proceeded += 1;
        } else {
            day.interventions.dismissed += 1;
        }

        self.snapshot.lifetime.total_interventions += 1;
        self.persist();
    }

    /// Record which intention the user declared at a choice point.
    ///
    /// Feeds pattern analytics only; never touches streak or score.
    pub fn record_intention(
        &mut self,
        intention_id: &str,
        proceeded: bool,
        custom_text: Option<String>,
        app_package: Option<String>,
    ) {
        let timestamp = self.clock.now();
        push_bounded(
            &mut self.snapshot.intention_history,
            IntentionLog {
                id: format!(
                    "{}-{:04x}",
                    timestamp.timestamp_millis(),
                    rand::random::<u16>()
                ),
                timestamp,
                intention_id: intention_id.to_string(),
                proceeded,
                custom_text,
                app_package,
            },
            INTENTION_HISTORY_CAP,
        );
        self.persist();
    }

    /// Add usage minutes for one app to today's record.
    pub fn record_usage_time(&mut self, app_id: &str, minutes: f64) {
        let now = self.clock.now();
        let bucket = self.clock.time_of_day(now);
        let day = self.snapshot.day_mut(&self.clock.day_key(now));
        day.has_data = true;
        day.total_usage_minutes += minutes;
        *day.app_breakdown.entry(app_id.to_string()).or_insert(0.0) += minutes;
        day.time_of_day.add(bucket, minutes);

        self.refresh_streak();
        self.persist();
    }

    /// Merge a per-app usage breakdown into a historical day.
    ///
    /// Used for backfilling usage collected out-of-band. Apps present in
    /// `breakdown` replace that app's value; other apps keep theirs. The
    /// day's total is recomputed as the sum of the merged map.
    pub fn set_daily_usage_breakdown(&mut self, day_key: &str, breakdown: HashMap<String, f64>) {
        let day = self.snapshot.day_mut(day_key);
        day.has_data = true;
        for (app, minutes) in breakdown {
            day.app_breakdown.insert(app, minutes);
        }
        day.total_usage_minutes = day.app_breakdown.values().sum();

        self.refresh_streak();
        self.persist();
    }

    /// Record a completed training session.
    ///
    /// Increments today's training counters only; streak, score and
    /// badges are untouched.
    pub fn record_training_session(&mut self, minutes: f64) {
        let today = self.clock.today_key();
        let day = self.snapshot.day_mut(&today);
        day.training.sessions_completed += 1;
        day.training.total_minutes += minutes;
        self.persist();
    }

    /// Apply the once-per-day habit score update.
    pub fn update_habit_score(&mut self) -> ScoreUpdate {
        let packages = if self.config.tracked_packages.is_empty() {
            None
        } else {
            Some(self.config.tracked_packages.as_slice())
        };
        let update = score::update_habit_score(
            &mut self.snapshot,
            self.clock.today(),
            self.config.daily_goal_minutes,
            packages,
        );
        if update != ScoreUpdate::AlreadyUpdated {
            self.persist();
        }
        update
    }

    /// Reset the engine to its zero state and clear the stored document.
    pub fn reset(&mut self) {
        self.snapshot = Snapshot::default();
        self.snapshot.lifetime.badges = badges::builtin_badges();
        self.snapshot.lifetime.start_date = self.clock.today_key();
        if let Err(e) = self.store.clear(STORAGE_KEY) {
            log::warn!("failed to clear persisted state: {e}");
        }
    }

    // ------------------------------------------------------------------
    // Badges
    // ------------------------------------------------------------------

    /// Assemble the badge-evaluation context from engine state.
    ///
    /// `reduction_percent` needs an externally supplied monthly baseline,
    /// so the caller passes it in (None leaves reduction badges dormant).
    pub fn badge_context(&self, reduction_percent: Option<f64>) -> BadgeContext {
        BadgeContext {
            habit_score: self.snapshot.habit_score,
            intervention_success_count: self.overall_intervention_success_rate().dismissed,
            reduction_percent,
        }
    }

    /// Evaluate unearned badges against the given context, stamping
    /// `earned_at` on newly satisfied ones. Returns newly earned ids.
    pub fn check_badges(&mut self, context: &BadgeContext) -> Vec<String> {
        let now = self.clock.now();
        let lifetime = self.snapshot.lifetime.clone();
        let earned = badges::check_badges(
            &mut self.snapshot.lifetime.badges,
            &lifetime,
            context,
            now,
        );
        if !earned.is_empty() {
            self.persist();
        }
        earned
    }

    // ------------------------------------------------------------------
    // Signals and rollups
    // ------------------------------------------------------------------

    /// Summed intervention outcomes across all days.
    pub fn overall_intervention_success_rate(&self) -> InterventionSuccessRate {
        let mut triggered = 0;
        let mut dismissed = 0;
        let mut proceeded = 0;
        for day in self.snapshot.daily_stats.values() {
            triggered += day.interventions.triggered;
            dismissed += day.interventions.dismissed;
            proceeded += day.interventions.proceeded;
        }
        let success_rate = if triggered > 0 {
            dismissed as f64 / triggered as f64
        } else {
            0.0
        };
        InterventionSuccessRate {
            triggered,
            dismissed,
            proceeded,
            success_rate,
        }
    }

    /// Whether intervention attempts are arriving unusually often, per the
    /// configured window and threshold. The notifier consuming this signal
    /// owns cooldown and debounce.
    pub fn is_high_frequency_attempts(&self) -> bool {
        self.high_frequency_attempts_within(
            self.config.high_frequency.window_ms,
            self.config.high_frequency.threshold,
        )
    }

    /// High-frequency check with explicit window and threshold.
    pub fn high_frequency_attempts_within(&self, window_ms: i64, threshold: usize) -> bool {
        let cutoff = self.clock.now() - Duration::milliseconds(window_ms);
        let recent = self
            .snapshot
            .intervention_history
            .iter()
            .filter(|r| r.timestamp >= cutoff)
            .count();
        recent >= threshold
    }

    // ------------------------------------------------------------------
    // Query layer delegates
    // ------------------------------------------------------------------

    pub fn today_stats(&self) -> stats::DayStats {
        stats::today_stats(&self.snapshot, &self.clock)
    }

    pub fn weekly_stats(&self) -> stats::WeeklyStats {
        stats::weekly_stats(&self.snapshot, self.clock.today())
    }

    pub fn monthly_achievement_stats(&self) -> stats::MonthlyAchievementStats {
        stats::monthly_achievement_stats(
            &self.snapshot,
            self.clock.today(),
            self.config.daily_goal_minutes,
        )
    }

    pub fn reduction_rate(&self, baseline_daily_minutes: f64) -> f64 {
        stats::reduction_rate(&self.snapshot, self.clock.today(), baseline_daily_minutes)
    }

    pub fn weekly_trend(&self) -> Vec<stats::WeekTrendPoint> {
        stats::weekly_trend(&self.snapshot, self.clock.today())
    }

    pub fn daily_comparison(&self) -> stats::PeriodComparison {
        stats::daily_comparison(&self.snapshot, self.clock.today())
    }

    pub fn weekly_comparison(&self) -> stats::PeriodComparison {
        stats::weekly_comparison(&self.snapshot, self.clock.today())
    }

    pub fn intention_pattern_stats(&self) -> Vec<stats::IntentionPattern> {
        stats::intention_pattern_stats(&self.snapshot)
    }

    pub fn time_of_day_patterns(&self) -> stats::TimeOfDayPatterns {
        stats::time_of_day_patterns(&self.snapshot)
    }

    // ------------------------------------------------------------------

    fn refresh_streak(&mut self) {
        let current = calculate_streak(
            &self.snapshot.daily_stats,
            self.clock.today(),
            self.config.daily_goal_minutes,
        );
        self.snapshot.lifetime.current_streak = current;
        if current > self.snapshot.lifetime.longest_streak {
            self.snapshot.lifetime.longest_streak = current;
        }
    }

    /// Best-effort mirror of the in-memory snapshot. Failures are logged,
    /// never surfaced: callers tolerate at-most-once durability.
    fn persist(&mut self) {
        let doc = match serde_json::to_string(&self.snapshot) {
            Ok(doc) => doc,
            Err(e) => {
                log::warn!("failed to serialize snapshot: {e}");
                return;
            }
        };
        if let Err(e) = self.store.set(STORAGE_KEY, &doc) {
            log::warn!("failed to persist snapshot: {e}");
        }
    }
}
