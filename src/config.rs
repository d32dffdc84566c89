use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

pub const SUPPORTED_LOCALES: &[&str] = &["ar", "en"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_exam_duration_secs")]
    pub exam_duration_secs: u32,
    #[serde(default = "default_warning_thresholds_secs")]
    pub warning_thresholds_secs: Vec<u32>,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
    #[serde(default = "default_tick_rate_ms")]
    pub tick_rate_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_save_history")]
    pub save_history: bool,
}

fn default_exam_duration_secs() -> u32 {
    3600
}
fn default_warning_thresholds_secs() -> Vec<u32> {
    vec![300, 60]
}
fn default_locale() -> String {
    "ar".to_string()
}
fn default_theme() -> String {
    "khatwa-dark".to_string()
}
fn default_tick_rate_ms() -> u64 {
    100
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_save_history() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            exam_duration_secs: default_exam_duration_secs(),
            warning_thresholds_secs: default_warning_thresholds_secs(),
            locale: default_locale(),
            theme: default_theme(),
            catalog_path: None,
            tick_rate_ms: default_tick_rate_ms(),
            log_level: default_log_level(),
            save_history: default_save_history(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        match Self::load_from(&path)? {
            Some(config) => Ok(config),
            None => {
                // First run: leave an editable file behind.
                let config = Config::default();
                if let Err(e) = config.save() {
                    warn!(path = %path.display(), error = %e, "could not write default config");
                }
                Ok(config)
            }
        }
    }

    /// `Ok(None)` when there is no file yet.
    pub fn load_from(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing {}", path.display()))?;
        config.normalize();
        Ok(Some(config))
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("khatwa")
            .join("config.toml")
    }

    /// Reset values an old or hand-edited file may carry out of range.
    /// A zero duration is left alone: starting the exam reports it.
    pub fn normalize(&mut self) {
        if !SUPPORTED_LOCALES.contains(&self.locale.as_str()) {
            self.locale = default_locale();
        }
        self.tick_rate_ms = self.tick_rate_ms.clamp(10, 1000);
        self.warning_thresholds_secs.retain(|&t| t > 0);
        if self.log_level.trim().is_empty() {
            self.log_level = default_log_level();
        }
    }
}
