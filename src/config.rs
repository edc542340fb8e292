use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::aggregate::TOP_N;

/// Config file read when `SALES_DASHBOARD_CONFIG` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

/// Dashboard settings.
///
/// ```json
/// {
///   "data_dir": "data",
///   "app_password": "…",
///   "last_updated": "21/10/2025",
///   "top_n": 20
/// }
/// ```
///
/// Every field is optional. `SALES_DATA_DIR` and `APP_PASSWORD` override
/// the file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub app_password: Option<String>,
    /// Free-text date shown under the title.
    pub last_updated: Option<String>,
    pub top_n: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            app_password: None,
            last_updated: None,
            top_n: TOP_N,
        }
    }
}

impl AppConfig {
    /// Load from the configured file, then apply environment overrides.
    pub fn load() -> Result<Self> {
        let path = std::env::var_os("SALES_DASHBOARD_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
        let mut config = Self::from_file(&path)?;
        config.apply_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a JSON config file. A missing file yields the defaults.
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: AppConfig = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply `SALES_DATA_DIR` / `APP_PASSWORD` from `lookup`. Empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(dir) = lookup("SALES_DATA_DIR").filter(|v| !v.is_empty()) {
            self.data_dir = PathBuf::from(dir);
        }
        if let Some(secret) = lookup("APP_PASSWORD").filter(|v| !v.is_empty()) {
            self.app_password = Some(secret);
        }
    }
}
