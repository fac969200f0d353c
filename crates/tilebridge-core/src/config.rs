//! Configuration system for tilebridge.
//!
//! Resolution order: environment variables → config file → defaults.
//!
//! Config file location:
//!   1. $TILEBRIDGE_CONFIG (explicit override)
//!   2. $XDG_CONFIG_HOME/tilebridge/config.toml
//!   3. ~/.config/tilebridge/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::chunk_id::Addressing;
use crate::layout::{LayoutError, StoreLayout};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TileBridgeConfig {
    pub store: StoreConfig,
    pub bridge: BridgeConfig,
    pub serve: ServeConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Where the static chunk store is served from.
    pub base_url: String,
    /// Directory holding chunk files, relative to `base_url`.
    pub chunk_dir: String,
    /// Map sub-directory inside `chunk_dir`. Empty = none.
    pub map: String,
    /// Per-request timeout in milliseconds. 0 = no timeout.
    pub timeout_ms: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    pub addressing: Addressing,
    /// Buffer between the runtime and the bridge's inbound side.
    pub channel_capacity: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServeConfig {
    /// Directory served as the static chunk store.
    pub root: PathBuf,
    pub port: u16,
}

// ── Defaults ──────────────────────────────────────────────────────────────────

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8080/".to_string(),
            chunk_dir: "map".to_string(),
            map: String::new(),
            timeout_ms: 0,
        }
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            addressing: Addressing::Axial,
            channel_capacity: 256,
        }
    }
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("public"),
            port: 8080,
        }
    }
}

impl StoreConfig {
    /// Validated layout for this store.
    pub fn layout(&self) -> Result<StoreLayout, LayoutError> {
        let map = Some(self.map.as_str()).filter(|m| !m.is_empty());
        StoreLayout::new(&self.base_url, &self.chunk_dir, map)
    }

    pub fn timeout(&self) -> Option<std::time::Duration> {
        (self.timeout_ms > 0).then(|| std::time::Duration::from_millis(self.timeout_ms))
    }
}

// ── Path helpers ──────────────────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| dirs_or_home().join(".config"))
        .join("tilebridge")
}

fn dirs_or_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {0}: {1}")]
    ReadFailed(PathBuf, std::io::Error),
    #[error("failed to parse {0}: {1}")]
    ParseFailed(PathBuf, toml::de::Error),
    #[error("failed to write {0}: {1}")]
    WriteFailed(PathBuf, std::io::Error),
    #[error("failed to serialize: {0}")]
    SerializeFailed(toml::ser::Error),
}

// ── Loading ───────────────────────────────────────────────────────────────────

impl TileBridgeConfig {
    /// Load config: env vars → file → defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::file_path();
        let mut config = if path.exists() {
            Self::load_from(&path)?
        } else {
            TileBridgeConfig::default()
        };
        config.apply_env_overrides(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a config file without applying env overrides.
    pub fn load_from(path: &std::path::Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadFailed(path.to_path_buf(), e))?;
        toml::from_str(&text).map_err(|e| ConfigError::ParseFailed(path.to_path_buf(), e))
    }

    /// Config file path.
    pub fn file_path() -> PathBuf {
        std::env::var("TILEBRIDGE_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| config_dir().join("config.toml"))
    }

    /// Write default config if none exists. Returns the path.
    pub fn write_default_if_missing() -> Result<PathBuf, ConfigError> {
        let path = Self::file_path();
        if !path.exists() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
            }
            let text = toml::to_string_pretty(&TileBridgeConfig::default())
                .map_err(ConfigError::SerializeFailed)?;
            std::fs::write(&path, text).map_err(|e| ConfigError::WriteFailed(path.clone(), e))?;
        }
        Ok(path)
    }

    /// Apply TILEBRIDGE_* overrides. Unparseable numeric or enum values are
    /// ignored and the previous value is kept.
    pub fn apply_env_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("TILEBRIDGE_STORE__BASE_URL") {
            self.store.base_url = v;
        }
        if let Some(v) = var("TILEBRIDGE_STORE__CHUNK_DIR") {
            self.store.chunk_dir = v;
        }
        if let Some(v) = var("TILEBRIDGE_STORE__MAP") {
            self.store.map = v;
        }
        if let Some(v) = var("TILEBRIDGE_STORE__TIMEOUT_MS") {
            if let Ok(ms) = v.parse() {
                self.store.timeout_ms = ms;
            }
        }
        if let Some(v) = var("TILEBRIDGE_BRIDGE__ADDRESSING") {
            if let Ok(addressing) = v.parse() {
                self.bridge.addressing = addressing;
            }
        }
        if let Some(v) = var("TILEBRIDGE_SERVE__ROOT") {
            self.serve.root = PathBuf::from(v);
        }
        if let Some(v) = var("TILEBRIDGE_SERVE__PORT") {
            if let Ok(p) = v.parse() {
                self.serve.port = p;
            }
        }
    }
}
