//! # Resurface Core Library
//!
//! This library provides the habit statistics and gamification engine
//! behind the Resurface habit-coaching app. It implements a CLI-first
//! philosophy where all operations are available via a standalone CLI
//! binary, with the mobile application being a thin UI layer over the
//! same core library.
//!
//! ## Architecture
//!
//! - **Tracker**: The aggregation store and its recording API; every
//!   mutation is a synchronous read-modify-write over one owned snapshot
//! - **Storage**: Injected key-value persistence (SQLite or in-memory)
//!   holding the whole state as a single JSON document, plus TOML
//!   configuration
//! - **Streak / Score / Badges**: Pure derived-state computation over the
//!   snapshot
//! - **Stats**: On-demand read-only projections (day, week, month,
//!   trends, comparisons, patterns)
//!
//! ## Key Components
//!
//! - [`HabitTracker`]: The engine; one instance per store
//! - [`StorageProvider`]: Injected persistence seam
//! - [`EngineConfig`]: Goal, tracked apps, time zone, signal thresholds
//! - [`DayClock`]: Calendar-day math with an explicit injected UTC offset

pub mod badges;
pub mod clock;
pub mod error;
pub mod model;
pub mod score;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod tracker;

pub use badges::{badge_progress, builtin_badges, BadgeContext, BadgeProgress};
pub use clock::{DayClock, TimeOfDay};
pub use error::{ConfigError, CoreError, StorageError};
pub use model::{
    Badge, BadgeCondition, DailyRecord, IntentionLog, InterventionRecord, LifetimeRecord,
    ScoreEntry, Snapshot,
};
pub use score::ScoreUpdate;
pub use storage::{EngineConfig, MemoryStore, SqliteStore, StorageProvider};
pub use streak::calculate_streak;
pub use tracker::{HabitTracker, InterventionEvent, InterventionSuccessRate, UrgeSurfOutcome};
