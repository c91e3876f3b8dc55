//! Client configuration

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_URL, DEFAULT_LOGIN_PATH, DEFAULT_REFRESH_PATH, DEFAULT_SCOPE_HEADER,
    DEFAULT_SCOPE_KEY, DEFAULT_SCOPE_STORE_FILE, DEFAULT_TIMEOUT_SECS,
};

/// Request pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL relative request paths are resolved against
    pub base_url: String,
    /// Session refresh endpoint path
    pub refresh_path: String,
    /// Path the host navigates to when the session cannot be recovered
    pub login_path: String,
    /// Header name used for the active shop
    pub scope_header: String,
    /// Key the active shop is persisted under
    pub scope_key: String,
    /// File backing the durable scope store
    pub scope_store_path: PathBuf,
    pub timeout_secs: u64,
    pub user_agent: Option<String>,
    pub log: LogConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LogConfig {
    /// Default filter directive, overridden by `RUST_LOG`
    pub level: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            refresh_path: DEFAULT_REFRESH_PATH.to_string(),
            login_path: DEFAULT_LOGIN_PATH.to_string(),
            scope_header: DEFAULT_SCOPE_HEADER.to_string(),
            scope_key: DEFAULT_SCOPE_KEY.to_string(),
            scope_store_path: PathBuf::from(DEFAULT_SCOPE_STORE_FILE),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            user_agent: None,
            log: LogConfig::default(),
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self { level: "info".to_string(), json: false }
    }
}
