use crate::backend::KillSignal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub window_width: i32,
    pub window_height: i32,
    pub refresh_interval_ms: u64,
    /// The process list is rebuilt every this many samples.
    pub process_refresh_ticks: u32,
    pub graph_height: i32,
    pub kill_signal: KillSignal,
    pub confirm_critical_kill: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_width: 900,
            window_height: 600,
            refresh_interval_ms: 1000,
            process_refresh_ticks: 8,
            graph_height: 200,
            kill_signal: KillSignal::Kill,
            confirm_critical_kill: true,
        }
    }
}

impl Config {
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        let Ok(data) = fs::read_to_string(path) else {
            return Config::default();
        };
        serde_json::from_str(&data).unwrap_or_else(|e| {
            log::warn!("Ignoring invalid config {}: {}", path.display(), e);
            Config::default()
        })
    }

    pub fn save(&self) {
        self.save_to(&config_path());
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(data) => {
                if let Err(e) = fs::write(path, data) {
                    log::warn!("Failed to save config to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Failed to serialize config: {}", e),
        }
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("system-dashboard")
        .join("config.json")
}
