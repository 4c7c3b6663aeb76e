//! User settings persistence.
//!
//! This module handles loading and saving user preferences across sessions:
//! the analysis service endpoint, the colour palette, and the last submitted
//! request form.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::client::DEFAULT_ENDPOINT;

/// Environment variable that overrides the saved endpoint
pub const ENDPOINT_ENV: &str = "APEXTRACE_ENDPOINT";

/// User settings that persist across sessions
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserSettings {
    /// Settings file version for migration support
    #[serde(default = "default_version")]
    pub version: u32,
    /// Base URL of the analysis service
    #[serde(default = "default_endpoint")]
    pub endpoint_url: String,
    /// Use the colour-blind friendly driver palette
    #[serde(default)]
    pub color_blind_mode: bool,
    /// Last submitted request form
    #[serde(default)]
    pub last_request: RequestForm,
}

/// Free-text request inputs as typed by the user
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestForm {
    pub year: String,
    pub race: String,
    pub drivers: String,
}

impl Default for RequestForm {
    fn default() -> Self {
        Self {
            year: "2023".to_string(),
            race: "Bahrain".to_string(),
            drivers: "VER, LEC".to_string(),
        }
    }
}

fn default_version() -> u32 {
    1
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            version: 1,
            endpoint_url: default_endpoint(),
            color_blind_mode: false,
            last_request: RequestForm::default(),
        }
    }
}

impl UserSettings {
    /// Get the config directory path for ApexTrace
    pub fn get_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("apextrace"))
    }

    /// Get the path to the settings JSON file
    pub fn get_settings_path() -> Option<PathBuf> {
        Self::get_config_dir().map(|p| p.join("settings.json"))
    }

    /// Load settings from disk, then apply the environment override
    pub fn load() -> Self {
        let mut settings = Self::get_settings_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default();
        settings.apply_endpoint_override(std::env::var(ENDPOINT_ENV).ok());
        settings
    }

    /// Load settings from a specific file. Missing or corrupt files give defaults.
    pub fn load_from(path: &std::path::Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring corrupt settings file {}: {}", path.display(), e);
                Self::default()
            }),
            Err(e) => {
                tracing::warn!("Failed to read settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Replace the endpoint with a non-empty override value
    pub fn apply_endpoint_override(&mut self, value: Option<String>) {
        if let Some(endpoint) = value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty()) {
            tracing::info!("Using analysis endpoint from {}: {}", ENDPOINT_ENV, endpoint);
            self.endpoint_url = endpoint;
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::get_settings_path().context("Could not determine config directory")?;
        self.save_to(&path)
    }

    /// Save settings to a specific file, creating parent directories
    pub fn save_to(&self, path: &std::path::Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory {}", parent.display())
            })?;
        }

        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write settings file {}", path.display()))?;

        Ok(())
    }
}
