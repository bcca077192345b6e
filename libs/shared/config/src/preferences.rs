//! Durable user preferences. The portal persists a single flag today:
//! whether reminders are enabled. Read once at start-up to decide whether
//! the reminder engine auto-starts.

use std::fs;
use std::io;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "remindersEnabled", default)]
    pub reminders_enabled: bool,
}

pub struct PreferencesStore {
    path: PathBuf,
}

impl PreferencesStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// A missing file means the user never enabled reminders; an unreadable
    /// one is treated the same way rather than failing start-up.
    pub fn load(&self) -> Preferences {
        match fs::read_to_string(&self.path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|e| {
                warn!("preferences file {} is corrupt ({}), using defaults", self.path.display(), e);
                Preferences::default()
            }),
            Err(_) => Preferences::default(),
        }
    }

    pub fn set_reminders_enabled(&self, enabled: bool) -> io::Result<()> {
        let mut preferences = self.load();
        preferences.reminders_enabled = enabled;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let raw = serde_json::to_string_pretty(&preferences).map_err(io::Error::other)?;
        fs::write(&self.path, raw)
    }
}
