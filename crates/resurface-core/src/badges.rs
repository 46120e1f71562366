//! Badge catalog, unlock evaluation, and progress display.
//!
//! Earning is monotonic: once a badge's `earned_at` is stamped it is never
//! re-evaluated or revoked, even if the underlying stat later drops below
//! the threshold.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::model::{Badge, BadgeCondition, LifetimeRecord};

/// Cross-cutting stats three badge conditions depend on, assembled by the
/// caller from engine getters. Required input: without it, reduction,
/// intervention-success and habit-score badges are unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BadgeContext {
    pub habit_score: i32,
    pub intervention_success_count: u32,
    /// Monthly usage reduction vs baseline, when a baseline is known.
    pub reduction_percent: Option<f64>,
}

/// Progress toward one badge, for display.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeProgress {
    pub current: f64,
    pub target: f64,
    /// 0-100, one decimal.
    pub percentage: f64,
}

/// Returns the built-in badge catalog, all unearned.
pub fn builtin_badges() -> Vec<Badge> {
    vec![
        badge(
            "first-wave",
            "First Wave",
            "Complete your first urge-surfing session",
            "🌊",
            BadgeCondition::FirstSurf,
        ),
        badge(
            "ten-waves",
            "Ten Waves",
            "Complete 10 urge-surfing sessions",
            "🏄",
            BadgeCondition::TotalSurfs { count: 10 },
        ),
        badge(
            "fifty-waves",
            "Fifty Waves",
            "Complete 50 urge-surfing sessions",
            "🌅",
            BadgeCondition::TotalSurfs { count: 50 },
        ),
        badge(
            "hundred-waves",
            "Hundred Waves",
            "Complete 100 urge-surfing sessions",
            "🏆",
            BadgeCondition::TotalSurfs { count: 100 },
        ),
        badge(
            "hour-reclaimed",
            "Hour Reclaimed",
            "Save a full hour of screen time",
            "⏳",
            BadgeCondition::SavedHours { hours: 1.0 },
        ),
        badge(
            "day-reclaimed",
            "Day Reclaimed",
            "Save a full day of screen time",
            "📅",
            BadgeCondition::SavedHours { hours: 24.0 },
        ),
        badge(
            "quarter-cut",
            "Quarter Cut",
            "Reduce monthly usage by 25%",
            "✂️",
            BadgeCondition::Reduction { percent: 25.0 },
        ),
        badge(
            "stand-firm",
            "Stand Firm",
            "Resist 25 interventions",
            "🛡️",
            BadgeCondition::InterventionSuccess { count: 25 },
        ),
        badge(
            "steady-mind",
            "Steady Mind",
            "Reach a habit score of 80",
            "🧘",
            BadgeCondition::HabitScore { score: 80 },
        ),
    ]
}

fn badge(id: &str, name: &str, description: &str, icon: &str, condition: BadgeCondition) -> Badge {
    Badge {
        id: id.to_string(),
        name: name.to_string(),
        description: description.to_string(),
        icon: icon.to_string(),
        condition,
        earned_at: None,
    }
}

/// Merge newly shipped catalog badges into a stored badge list by id.
///
/// Stored badges keep their `earned_at`; badges added to the catalog after
/// the document was written appear unearned.
pub fn merge_catalog(stored: &mut Vec<Badge>) {
    for catalog_badge in builtin_badges() {
        if !stored.iter().any(|b| b.id == catalog_badge.id) {
            stored.push(catalog_badge);
        }
    }
}

/// Whether a badge's condition holds against the given stats.
pub fn condition_met(
    condition: &BadgeCondition,
    lifetime: &LifetimeRecord,
    context: &BadgeContext,
) -> bool {
    match condition {
        BadgeCondition::FirstSurf => lifetime.total_urge_surfing_completed >= 1,
        BadgeCondition::TotalSurfs { count } => lifetime.total_urge_surfing_completed >= *count,
        BadgeCondition::SavedHours { hours } => lifetime.total_saved_hours >= *hours,
        BadgeCondition::Reduction { percent } => context
            .reduction_percent
            .map(|r| r >= *percent)
            .unwrap_or(false),
        BadgeCondition::InterventionSuccess { count } => {
            context.intervention_success_count >= *count
        }
        BadgeCondition::HabitScore { score } => context.habit_score >= *score,
    }
}

/// Stamp `earned_at` on every unearned badge whose condition now holds.
///
/// Returns the ids of newly earned badges. Already-earned badges are
/// skipped entirely.
pub fn check_badges(
    badges: &mut [Badge],
    lifetime: &LifetimeRecord,
    context: &BadgeContext,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut newly_earned = Vec::new();
    for badge in badges.iter_mut() {
        if badge.is_earned() {
            continue;
        }
        if condition_met(&badge.condition, lifetime, context) {
            badge.earned_at = Some(now);
            newly_earned.push(badge.id.clone());
        }
    }
    if !newly_earned.is_empty() {
        log::info!("earned badges: {}", newly_earned.join(", "));
    }
    newly_earned
}

/// Progress toward a badge, clamped so `current` never exceeds `target`.
/// Earned badges report 100% unconditionally.
pub fn badge_progress(
    badge: &Badge,
    lifetime: &LifetimeRecord,
    context: &BadgeContext,
) -> BadgeProgress {
    let (raw_current, target) = match &badge.condition {
        BadgeCondition::FirstSurf => (lifetime.total_urge_surfing_completed as f64, 1.0),
        BadgeCondition::TotalSurfs { count } => {
            (lifetime.total_urge_surfing_completed as f64, *count as f64)
        }
        BadgeCondition::SavedHours { hours } => (lifetime.total_saved_hours, *hours),
        BadgeCondition::Reduction { percent } => {
            (context.reduction_percent.unwrap_or(0.0).max(0.0), *percent)
        }
        BadgeCondition::InterventionSuccess { count } => {
            (context.intervention_success_count as f64, *count as f64)
        }
        BadgeCondition::HabitScore { score } => (context.habit_score as f64, *score as f64),
    };

    if badge.is_earned() {
        return BadgeProgress {
            current: target,
            target,
            percentage: 100.0,
        };
    }

    let current = raw_current.min(target);
    let percentage = if target > 0.0 {
        ((current / target) * 1000.0).round() / 10.0
    } else {
        0.0
    };

    BadgeProgress {
        current,
        target,
        percentage,
    }
}
