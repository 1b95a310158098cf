use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::analysis::{AnalysisConfig, DEFAULT_TOP_N};
use crate::error::{LensError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// chrono format string tried before the built-in date formats.
    #[serde(default)]
    pub date_format: Option<String>,
}

fn default_top_n() -> usize {
    DEFAULT_TOP_N
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            date_format: None,
        }
    }
}

impl Settings {
    /// Engine config from these settings; thresholds stay at their defaults.
    pub fn analysis_config(&self) -> AnalysisConfig {
        AnalysisConfig {
            // A hand-edited 0 falls back to one row.
            top_n: self.top_n.max(1),
            date_format: self.date_format.clone(),
            ..AnalysisConfig::default()
        }
    }
}

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("ledgerlens")
}

pub fn settings_path() -> PathBuf {
    config_dir().join("settings.json")
}

pub fn load_settings() -> Settings {
    load_settings_from(&settings_path())
}

/// Missing or unreadable settings fall back to defaults.
pub fn load_settings_from(path: &Path) -> Settings {
    if path.exists() {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        serde_json::from_str(&content).unwrap_or_default()
    } else {
        Settings::default()
    }
}

pub fn save_settings(settings: &Settings) -> Result<()> {
    save_settings_to(&settings_path(), settings)
}

pub fn save_settings_to(path: &Path, settings: &Settings) -> Result<()> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let json = serde_json::to_string_pretty(settings)
        .map_err(|e| LensError::Settings(e.to_string()))?;
    std::fs::write(path, format!("{json}\n"))?;
    Ok(())
}
