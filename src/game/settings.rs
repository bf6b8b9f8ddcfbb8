use log::warn;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

use crate::error::PersistError;
use crate::platform::{read_json, write_json, Storage};

pub const SETTINGS_KEY: &str = "settings";

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Settings {
    #[serde(default = "default_version")]
    version: u32,

    /// Name offered by default when the next win is recorded.
    #[serde(default)]
    pub last_player_name: Option<String>,
}

fn default_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            version: default_version(),
            last_player_name: None,
        }
    }
}

impl Settings {
    /// Loads settings, falling back to defaults when absent or unreadable.
    pub fn load(storage: &dyn Storage) -> Self {
        match read_json::<Settings>(storage, SETTINGS_KEY) {
            Ok(Some(mut settings)) => {
                settings.migrate();
                settings
            }
            Ok(None) => Settings::default(),
            Err(e) => {
                warn!(target: "settings", "Ignoring saved settings: {}", e);
                Settings::default()
            }
        }
    }

    pub fn save(&self, storage: &mut dyn Storage) -> Result<(), PersistError> {
        write_json(storage, SETTINGS_KEY, self)
    }

    fn migrate(&mut self) {
        match self.version {
            0 => {
                self.version = 1;
            }
            _ => (),
        }
    }

    /// `GUESSRANK_DATA_DIR`, else the XDG data directory, else a dot
    /// directory under the working directory.
    pub fn data_dir() -> PathBuf {
        if let Some(dir) = env::var_os("GUESSRANK_DATA_DIR").filter(|v| !v.is_empty()) {
            return PathBuf::from(dir);
        }
        if let Some(dir) = env::var_os("XDG_DATA_HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(dir).join("guessrank");
        }
        if let Some(home) = env::var_os("HOME").filter(|v| !v.is_empty()) {
            return PathBuf::from(home).join(".local/share/guessrank");
        }
        PathBuf::from(".guessrank")
    }

    pub fn is_debug_mode() -> bool {
        env::var("DEBUG").map(|v| v == "1").unwrap_or(false)
    }

    pub fn seed_from_env() -> Option<u64> {
        let value = env::var("SEED").ok()?;
        match value.trim().parse::<u64>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warn!(target: "settings", "Ignoring unparsable SEED {:?}", value);
                None
            }
        }
    }
}
