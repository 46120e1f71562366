use resurface_core::{EngineConfig, HabitTracker, SqliteStore};

/// Open the tracker against the default data directory.
pub fn open_tracker() -> Result<HabitTracker, Box<dyn std::error::Error>> {
    let config = EngineConfig::load()?;
    let store = SqliteStore::open()?;
    Ok(HabitTracker::new(Box::new(store), config))
}
