//! Configuration management
//!
//! Settings live in `settings.json` inside the data directory:
//! ```json
//! {
//!   "app": { "userId": "local", "authTimeoutMs": 10000, "logLevel": "info" }
//! }
//! ```
//! Keys this crate does not manage are preserved when saving.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};
use crate::services::DEFAULT_AUTH_TIMEOUT;

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_USER: &str = "local";
pub const DEFAULT_LOG_LEVEL: &str = "warn";
pub const DB_FILENAME: &str = "saldo.duckdb";

/// Raw settings.json structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsFile {
    #[serde(default)]
    app: AppSettings,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AppSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    auth_timeout_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    log_level: Option<String>,
    #[serde(flatten)]
    other: HashMap<String, serde_json::Value>,
}

/// Saldo configuration (resolved view of settings plus environment)
#[derive(Debug, Clone)]
pub struct Config {
    pub user_id: String,
    pub auth_timeout: Duration,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: DEFAULT_USER.to_string(),
            auth_timeout: DEFAULT_AUTH_TIMEOUT,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

fn read_settings(saldo_dir: &Path) -> Result<SettingsFile> {
    let settings_path = saldo_dir.join(SETTINGS_FILE);
    if !settings_path.exists() {
        return Ok(SettingsFile::default());
    }
    let content = std::fs::read_to_string(&settings_path)?;
    serde_json::from_str(&content)
        .map_err(|e| Error::Config(format!("{}: {}", settings_path.display(), e)))
}

impl Config {
    /// Data directory: `SALDO_DIR`, else `~/.saldo`
    pub fn data_dir() -> Result<PathBuf> {
        if let Ok(dir) = std::env::var("SALDO_DIR") {
            return Ok(PathBuf::from(dir));
        }
        dirs::home_dir()
            .map(|home| home.join(".saldo"))
            .ok_or_else(|| Error::Config("cannot determine home directory".to_string()))
    }

    /// Load config from the data directory, applying `SALDO_*` overrides
    pub fn load(saldo_dir: &Path) -> Result<Self> {
        Self::load_with(saldo_dir, |key| std::env::var(key).ok())
    }

    fn load_with(saldo_dir: &Path, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let raw = read_settings(saldo_dir)?;
        let defaults = Self::default();

        let user_id = env("SALDO_USER")
            .or(raw.app.user_id)
            .filter(|u| !u.trim().is_empty())
            .unwrap_or(defaults.user_id);

        let auth_timeout = match env("SALDO_AUTH_TIMEOUT_MS") {
            Some(ms) => Duration::from_millis(ms.trim().parse().map_err(|_| {
                Error::Config(format!("SALDO_AUTH_TIMEOUT_MS is not a number: {}", ms))
            })?),
            None => raw
                .app
                .auth_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.auth_timeout),
        };

        let log_level = env("SALDO_LOG")
            .or(raw.app.log_level)
            .unwrap_or(defaults.log_level);

        Ok(Self {
            user_id,
            auth_timeout,
            log_level,
        })
    }

    /// Save config to the data directory
    /// Preserves other settings this crate doesn't manage
    pub fn save(&self, saldo_dir: &Path) -> Result<()> {
        std::fs::create_dir_all(saldo_dir)?;
        let mut settings = read_settings(saldo_dir).unwrap_or_default();

        settings.app.user_id = Some(self.user_id.clone());
        settings.app.auth_timeout_ms = Some(self.auth_timeout.as_millis() as u64);
        settings.app.log_level = Some(self.log_level.clone());

        let content = serde_json::to_string_pretty(&settings)?;
        std::fs::write(saldo_dir.join(SETTINGS_FILE), content)?;
        Ok(())
    }
}
