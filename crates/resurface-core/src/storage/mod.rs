//! Durable storage for the engine.
//!
//! The engine persists its entire state as one JSON document under a
//! fixed key in an opaque key-value provider. The provider is injected,
//! so tests run against [`MemoryStore`] while the app uses [`SqliteStore`].

mod config;
mod kv;
pub mod migrate;

pub use config::{EngineConfig, HighFrequencyConfig};
pub use kv::{MemoryStore, SqliteStore};

use std::path::PathBuf;

use crate::error::StorageError;

/// Opaque durable key-value store with get/set/clear semantics.
///
/// Implementations are best-effort mirrors of in-memory state; a failed
/// write must not corrupt previously stored values.
pub trait StorageProvider {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if any.
    fn clear(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/resurface[-dev]/` based on RESURFACE_ENV.
///
/// Set RESURFACE_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if the config directory cannot be created.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("RESURFACE_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("resurface-dev")
    } else {
        base_dir.join("resurface")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
