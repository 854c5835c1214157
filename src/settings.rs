//! User settings persistence.
//!
//! This module handles loading and saving user preferences across sessions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use crate::api::{BASE_URL_ENV, DEFAULT_BASE_URL};
use crate::poller::PollSchedule;
use crate::viewport::ShowLast;

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Base URL of the ChillRate API, including the version prefix
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Per-request timeout
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Delay before the first background refresh of a detail view
    #[serde(default = "default_poll_initial_delay_ms")]
    pub poll_initial_delay_ms: u64,
    /// Period between background refreshes
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,
    /// "Show last N" preset applied when a detail view opens (0 = all)
    #[serde(default = "default_show_last")]
    pub default_show_last: usize,
    /// Draw point markers on the detail chart
    #[serde(default)]
    pub show_dots: bool,
}

fn default_version() -> u32 {
    1
}

fn default_api_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_request_timeout_secs() -> u64 {
    15
}

fn default_poll_initial_delay_ms() -> u64 {
    1000
}

fn default_poll_period_ms() -> u64 {
    5000
}

fn default_show_last() -> usize {
    50
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            api_base_url: default_api_base_url(),
            request_timeout_secs: default_request_timeout_secs(),
            poll_initial_delay_ms: default_poll_initial_delay_ms(),
            poll_period_ms: default_poll_period_ms(),
            default_show_last: default_show_last(),
            show_dots: false,
        }
    }
}

impl UserSettings {
    /// Get the config directory path for ChillRate
    pub fn get_config_dir() -> Option<PathBuf> {
        #[cfg(target_os = "macos")]
        {
            dirs::data_dir().map(|p| p.join("ChillRate"))
        }
        #[cfg(target_os = "windows")]
        {
            dirs::config_dir().map(|p| p.join("ChillRate"))
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows")))]
        {
            dirs::config_dir().map(|p| p.join("chillrate"))
        }
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk
    pub fn load() -> Self {
        let path = match Self::get_settings_path() {
            Some(p) => p,
            None => return Self::default(),
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Self::from_json(&content),
            Err(_) => Self::default(),
        }
    }

    /// Parse settings, falling back to defaults for anything unreadable
    pub fn from_json(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_default()
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let path = Self::get_settings_path()
            .ok_or_else(|| "Could not determine config directory".to_string())?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create config directory: {}", e))?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize settings: {}", e))?;

        std::fs::write(&path, content)
            .map_err(|e| format!("Failed to write settings file: {}", e))?;

        Ok(())
    }

    /// Base URL to use, letting `CHILLRATE_API_URL` win over the file
    pub fn effective_base_url(&self) -> String {
        self.base_url_with_override(std::env::var(BASE_URL_ENV).ok())
    }

    pub fn base_url_with_override(&self, env_value: Option<String>) -> String {
        env_value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| self.api_base_url.clone())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    pub fn poll_schedule(&self) -> PollSchedule {
        PollSchedule::from_millis(self.poll_initial_delay_ms, self.poll_period_ms)
    }

    pub fn show_last(&self) -> ShowLast {
        match self.default_show_last {
            0 => ShowLast::All,
            n => ShowLast::Last(n),
        }
    }
}
