use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;
use crate::map_updater::{DEFAULT_MAP_HEIGHT, DEFAULT_MAP_WIDTH};

pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSettings {
    /// View width in squares until the server sends a map size.
    pub map_width: i32,
    pub map_height: i32,
    pub log_level: String,
    /// Optional file receiving a copy of the log.
    pub log_file: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            map_width: DEFAULT_MAP_WIDTH,
            map_height: DEFAULT_MAP_HEIGHT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_file: None,
        }
    }
}

impl ClientSettings {
    /// Reads settings from `path`. A missing file gives the defaults; so
    /// does an unreadable one, with a warning.
    pub fn load(path: &Path) -> Self {
        let bytes = match fs::read(path) {
            Ok(b) => b,
            Err(_) => return Self::default(),
        };

        match serde_json::from_slice::<ClientSettings>(&bytes) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to parse settings file {:?}: {e}", path);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, format!("{json}\n"))?;
        Ok(())
    }
}
