use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

pub const APP_NAME: &str = "colloquy";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable that overrides the settings file location.
pub const SETTINGS_ENV: &str = "COLLOQUY_SETTINGS";

/// Fallback tracing filter when RUST_LOG is not set.
pub fn default_log_filter() -> &'static str {
    "colloquy=info"
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("settings file not found at {0}")]
    Missing(PathBuf),
    #[error("cannot read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid CORS origin pattern: {0}")]
    OriginPattern(#[from] regex::Error),
}

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    pub llm: LlmSettings,
    #[serde(default)]
    pub storage: StorageSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
    #[serde(default = "default_origin_pattern")]
    pub cors_allow_origin_regex: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            cors_allow_origin_regex: default_origin_pattern(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmSettings {
    /// OpenAI-compatible API root, without the /v1 suffix.
    pub api_url: String,
    pub api_key: String,
    #[serde(default = "default_embedding_model")]
    pub embedding_model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    /// Source document the vector index is built from, if any.
    #[serde(default)]
    pub document_path: Option<PathBuf>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            document_path: None,
        }
    }
}

fn default_bind_addr() -> String {
    "127.0.0.1:8000".to_string()
}

fn default_origin_pattern() -> String {
    ".*".to_string()
}

fn default_embedding_model() -> String {
    "bge-m3".to_string()
}

/// Per-user application data directory.
pub fn app_data_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .expect("Cannot determine a data directory");
    base.join(APP_NAME)
}

pub fn default_database_path() -> PathBuf {
    app_data_dir().join("colloquy.db")
}

impl Settings {
    /// Load settings from an explicit path.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Err(ConfigError::Missing(path.to_path_buf()));
        }
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_yaml::from_str(&raw)?)
    }

    /// Load from `$COLLOQUY_SETTINGS`, falling back to ./settings.yaml.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = std::env::var(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("settings.yaml"));
        Self::load(&path)
    }
}
