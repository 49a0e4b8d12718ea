use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::query::{BOARD_LIMIT, BoardQuery, HUB_CODE};
use crate::render::Lang;

/// Timetable endpoint (three days back, one day ahead)
pub const DEFAULT_FEED_URL: &str =
    "https://meridian.centrum-air.com/meridian-server/rest/named-queries/timetable?left=3&right=1";

/// Board configuration file structure
///
/// Every key is optional; a missing file means all defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(default = "default_feed_url")]
    pub feed_url: String,
    /// Sent verbatim as the `Authorization` header, e.g. `Basic ...`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorization: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_hub")]
    pub hub: String,
    #[serde(default = "default_board_limit")]
    pub board_limit: usize,
    /// 0 disables the catalog cache
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    #[serde(default)]
    pub lang: Lang,
}

fn default_feed_url() -> String {
    DEFAULT_FEED_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_hub() -> String {
    HUB_CODE.to_string()
}

fn default_board_limit() -> usize {
    BOARD_LIMIT
}

fn default_cache_ttl_secs() -> u64 {
    60
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            feed_url: default_feed_url(),
            authorization: None,
            timeout_secs: default_timeout_secs(),
            hub: default_hub(),
            board_limit: default_board_limit(),
            cache_ttl_secs: default_cache_ttl_secs(),
            lang: Lang::default(),
        }
    }
}

impl BoardConfig {
    /// Load config from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;
        let config: BoardConfig =
            toml::from_str(&contents).with_context(|| format!("Failed to parse {:?}", path))?;
        Ok(config)
    }

    /// Resolve, load and apply environment overrides.
    ///
    /// An explicitly given path must exist; the default path is optional.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => {
                let path = config_path();
                if path.exists() {
                    Self::load(&path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// `FLIGHTBOARD_FEED_URL` and `FLIGHTBOARD_AUTHORIZATION` win over the file
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("FLIGHTBOARD_FEED_URL")
            && !url.trim().is_empty()
        {
            self.feed_url = url;
        }
        if let Ok(authorization) = std::env::var("FLIGHTBOARD_AUTHORIZATION")
            && !authorization.trim().is_empty()
        {
            self.authorization = Some(authorization);
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn board_query(&self) -> BoardQuery {
        BoardQuery {
            hub: self.hub.clone(),
            limit: self.board_limit,
        }
    }
}

/// Resolve the config file path.
///
/// Priority:
/// 1. `FLIGHTBOARD_CONFIG` env var
/// 2. `./flightboard.toml`
pub fn config_path() -> PathBuf {
    match std::env::var("FLIGHTBOARD_CONFIG") {
        Ok(path) => PathBuf::from(path),
        Err(_) => PathBuf::from("./flightboard.toml"),
    }
}
