//! Configuration loader
//!
//! ## Loading Strategy
//! 1. Loads a `.env` file into the process environment, if one exists
//! 2. Attempts to build the config from environment variables
//! 3. If `SHOPWIRE_BASE_URL` is missing, falls back to a config file
//! 4. Probes multiple paths for config files (JSON or TOML)
//!
//! ## Environment Variables
//! - `SHOPWIRE_BASE_URL`: API base URL (required for env loading)
//! - `SHOPWIRE_REFRESH_PATH`: Session refresh endpoint path
//! - `SHOPWIRE_LOGIN_PATH`: Path the host is sent to on session teardown
//! - `SHOPWIRE_SCOPE_HEADER`: Header carrying the active shop
//! - `SHOPWIRE_SCOPE_KEY`: Key the active shop is persisted under
//! - `SHOPWIRE_SCOPE_STORE`: Durable scope store file
//! - `SHOPWIRE_TIMEOUT_SECS`: Per-request timeout in seconds
//! - `SHOPWIRE_USER_AGENT`: User agent override
//! - `SHOPWIRE_LOG_LEVEL`: Default tracing filter
//! - `SHOPWIRE_LOG_JSON`: Emit JSON log lines (true/false)
//!
//! Unset optional variables keep their [`ClientConfig::default`] values.
//!
//! ## File Locations
//! `shopwire.{json,toml}` then `config.{json,toml}`, in the working
//! directory, its parent, and next to the executable.

use std::path::{Path, PathBuf};

use shopwire_domain::{ClientConfig, Result, ShopwireError};

const CONFIG_STEMS: [&str; 2] = ["shopwire", "config"];

/// Load configuration with automatic fallback strategy
///
/// # Errors
/// Returns `ShopwireError::Config` if neither the environment nor any
/// config file yields a valid configuration.
pub fn load() -> Result<ClientConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        tracing::debug!(path = %path.display(), "Loaded .env file");
    }

    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// # Errors
/// Returns `ShopwireError::Config` if `SHOPWIRE_BASE_URL` is missing or a
/// numeric variable does not parse.
pub fn load_from_env() -> Result<ClientConfig> {
    let mut config = ClientConfig { base_url: env_var("SHOPWIRE_BASE_URL")?, ..Default::default() };

    if let Some(path) = env_opt("SHOPWIRE_REFRESH_PATH") {
        config.refresh_path = path;
    }
    if let Some(path) = env_opt("SHOPWIRE_LOGIN_PATH") {
        config.login_path = path;
    }
    if let Some(header) = env_opt("SHOPWIRE_SCOPE_HEADER") {
        config.scope_header = header;
    }
    if let Some(key) = env_opt("SHOPWIRE_SCOPE_KEY") {
        config.scope_key = key;
    }
    if let Some(path) = env_opt("SHOPWIRE_SCOPE_STORE") {
        config.scope_store_path = PathBuf::from(path);
    }
    if let Some(secs) = env_opt("SHOPWIRE_TIMEOUT_SECS") {
        config.timeout_secs = secs
            .parse::<u64>()
            .map_err(|e| ShopwireError::Config(format!("Invalid timeout: {e}")))?;
    }
    config.user_agent = env_opt("SHOPWIRE_USER_AGENT");
    if let Some(level) = env_opt("SHOPWIRE_LOG_LEVEL") {
        config.log.level = level;
    }
    config.log.json = env_bool("SHOPWIRE_LOG_JSON", config.log.json);

    Ok(config)
}

/// Load configuration from a file
///
/// If `path` is `None`, probes the standard locations. The format is
/// detected by file extension. Missing fields take their defaults.
///
/// # Errors
/// Returns `ShopwireError::Config` if the file is missing, unreadable, or
/// malformed.
pub fn load_from_file(path: Option<PathBuf>) -> Result<ClientConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ShopwireError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ShopwireError::Config("No config file found in any of the standard locations".into())
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ShopwireError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

fn parse_config(contents: &str, path: &Path) -> Result<ClientConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ShopwireError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ShopwireError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ShopwireError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe the standard locations for a config file
///
/// # Returns
/// The first config file found, or `None` if no file exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut dirs = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        let parent = cwd.join("..");
        dirs.extend([cwd, parent]);
    }

    if let Some(exe_dir) =
        std::env::current_exe().ok().and_then(|exe| exe.parent().map(Path::to_path_buf))
    {
        dirs.push(exe_dir);
    }

    dirs.iter()
        .flat_map(|dir| {
            CONFIG_STEMS.iter().flat_map(move |stem| {
                ["json", "toml"].iter().map(move |ext| dir.join(format!("{stem}.{ext}")))
            })
        })
        .find(|path| path.exists())
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ShopwireError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Optional variable; blank counts as unset.
fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use shopwire_domain::constants::{DEFAULT_REFRESH_PATH, DEFAULT_SCOPE_HEADER};
    use tempfile::tempdir;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const ALL_VARS: [&str; 10] = [
        "SHOPWIRE_BASE_URL",
        "SHOPWIRE_REFRESH_PATH",
        "SHOPWIRE_LOGIN_PATH",
        "SHOPWIRE_SCOPE_HEADER",
        "SHOPWIRE_SCOPE_KEY",
        "SHOPWIRE_SCOPE_STORE",
        "SHOPWIRE_TIMEOUT_SECS",
        "SHOPWIRE_USER_AGENT",
        "SHOPWIRE_LOG_LEVEL",
        "SHOPWIRE_LOG_JSON",
    ];

    fn clear_env() {
        for key in ALL_VARS {
            std::env::remove_var(key);
        }
    }

    #[test]
    fn test_env_bool_parsing() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        for value in ["1", "true", "YES", "on"] {
            std::env::set_var("SHOPWIRE_TEST_BOOL", value);
            assert!(env_bool("SHOPWIRE_TEST_BOOL", false), "{value} should be true");
        }
        for value in ["0", "false", "no", "off"] {
            std::env::set_var("SHOPWIRE_TEST_BOOL", value);
            assert!(!env_bool("SHOPWIRE_TEST_BOOL", true), "{value} should be false");
        }

        std::env::remove_var("SHOPWIRE_TEST_BOOL");
        assert!(env_bool("SHOPWIRE_TEST_BOOL", true));
        assert!(!env_bool("SHOPWIRE_TEST_BOOL", false));
    }

    #[test]
    fn test_load_from_env_all_vars_set() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("SHOPWIRE_BASE_URL", "https://shop.example.com/api");
        std::env::set_var("SHOPWIRE_REFRESH_PATH", "/session/renew");
        std::env::set_var("SHOPWIRE_LOGIN_PATH", "/signin");
        std::env::set_var("SHOPWIRE_SCOPE_HEADER", "X-Tenant");
        std::env::set_var("SHOPWIRE_SCOPE_KEY", "tenant");
        std::env::set_var("SHOPWIRE_SCOPE_STORE", "/tmp/shopwire-test.scope");
        std::env::set_var("SHOPWIRE_TIMEOUT_SECS", "5");
        std::env::set_var("SHOPWIRE_USER_AGENT", "shopwire-tests");
        std::env::set_var("SHOPWIRE_LOG_LEVEL", "debug");
        std::env::set_var("SHOPWIRE_LOG_JSON", "true");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.base_url, "https://shop.example.com/api");
        assert_eq!(config.refresh_path, "/session/renew");
        assert_eq!(config.login_path, "/signin");
        assert_eq!(config.scope_header, "X-Tenant");
        assert_eq!(config.scope_key, "tenant");
        assert_eq!(config.scope_store_path, PathBuf::from("/tmp/shopwire-test.scope"));
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent.as_deref(), Some("shopwire-tests"));
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);
    }

    #[test]
    fn test_load_from_env_uses_defaults_for_optional_vars() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("SHOPWIRE_BASE_URL", "https://shop.example.com/api");
        std::env::set_var("SHOPWIRE_SCOPE_HEADER", "   ");

        let result = load_from_env();
        clear_env();

        let config = result.expect("config from env");
        assert_eq!(config.refresh_path, DEFAULT_REFRESH_PATH);
        assert_eq!(config.scope_header, DEFAULT_SCOPE_HEADER);
        assert!(config.user_agent.is_none());
    }

    #[test]
    fn test_load_from_env_missing_base_url() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        let result = load_from_env();
        assert!(matches!(result, Err(ShopwireError::Config(_))));
    }

    #[test]
    fn test_load_from_env_invalid_timeout() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");
        clear_env();

        std::env::set_var("SHOPWIRE_BASE_URL", "https://shop.example.com/api");
        std::env::set_var("SHOPWIRE_TIMEOUT_SECS", "soon");

        let result = load_from_env();
        clear_env();

        assert!(matches!(result, Err(ShopwireError::Config(_))));
    }

    #[test]
    fn test_load_from_file_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shopwire.json");
        std::fs::write(
            &path,
            r#"{ "base_url": "https://shop.example.com/api", "log": { "json": true } }"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.base_url, "https://shop.example.com/api");
        assert!(config.log.json);
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_load_from_file_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shopwire.toml");
        std::fs::write(
            &path,
            r#"
base_url = "https://shop.example.com/api"
timeout_secs = 12

[log]
level = "warn"
"#,
        )
        .unwrap();

        let config = load_from_file(Some(path)).unwrap();
        assert_eq!(config.timeout_secs, 12);
        assert_eq!(config.log.level, "warn");
        assert_eq!(config.scope_header, DEFAULT_SCOPE_HEADER);
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(Some(PathBuf::from("/nonexistent/shopwire.json")));
        assert!(matches!(result, Err(ShopwireError::Config(_))));
    }

    #[test]
    fn test_load_from_file_invalid_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("shopwire.json");
        std::fs::write(&path, r#"{ "base_url": "#).unwrap();

        let result = load_from_file(Some(path));
        assert!(matches!(result, Err(ShopwireError::Config(_))));
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("base_url: x", Path::new("shopwire.yaml"));
        assert!(matches!(result, Err(ShopwireError::Config(_))));
    }
}
