use std::env;
use tracing::warn;

pub mod preferences;

pub use preferences::{Preferences, PreferencesStore};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Path of the local records file standing in for the portal backend.
    pub records_path: String,
    /// Path of the persisted user preferences file.
    pub preferences_path: String,
    /// Seconds between reminder due-checks.
    pub tick_interval_secs: u64,
    /// Seconds between snapshot re-reads of the records file.
    pub snapshot_refresh_secs: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            records_path: env::var("PORTAL_RECORDS_PATH").unwrap_or_else(|_| {
                warn!("PORTAL_RECORDS_PATH not set, using data/records.json");
                "data/records.json".to_string()
            }),
            preferences_path: env::var("PORTAL_PREFERENCES_PATH").unwrap_or_else(|_| {
                warn!("PORTAL_PREFERENCES_PATH not set, using data/preferences.json");
                "data/preferences.json".to_string()
            }),
            tick_interval_secs: env_u64("PORTAL_TICK_INTERVAL_SECS", 60),
            snapshot_refresh_secs: env_u64("PORTAL_SNAPSHOT_REFRESH_SECS", 300),
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            warn!("{} has a non-numeric value, using {}", name, default);
            default
        }),
        Err(_) => default,
    }
}
