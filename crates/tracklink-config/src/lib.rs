// SPDX-License-Identifier: GPL-3.0-or-later
use std::path::Path;

use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Spotify client-credentials configuration. The base URL overrides exist
/// for pointing the client at a mock server.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: Option<String>,
    pub auth_base_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppleMusicConfig {
    pub developer_token: String,
    pub base_url: Option<String>,
    pub storefront: String,
}

impl Default for AppleMusicConfig {
    fn default() -> Self {
        Self {
            developer_token: String::new(),
            base_url: None,
            storefront: "us".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Minimum combined similarity a fuzzy metadata candidate must exceed
    /// (strictly) to be accepted.
    pub confidence_threshold: f64,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.8,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    pub log_level: String,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub spotify: SpotifyConfig,
    pub apple_music: AppleMusicConfig,
    pub matching: MatchingConfig,
    pub telemetry: TelemetryConfig,
}

/// Load configuration from defaults, optional TOML file, and environment
/// overrides (prefix: TRACKLINK_, sections separated by __).
pub fn load(config_path: Option<&Path>) -> Result<AppConfig> {
    let mut figment = Figment::from(Serialized::defaults(AppConfig::default()));

    if let Some(path) = config_path {
        figment = figment.merge(Toml::file(path));
    }

    figment = figment.merge(Env::prefixed("TRACKLINK_").split("__"));

    let config: AppConfig = figment.extract()?;
    info!(target: "config", "configuration loaded");
    Ok(config)
}
