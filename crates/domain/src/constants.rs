//! Wire-level constants
//!
//! Defaults for the fixed names the server and the host application agree on.

/// Header carrying the active shop on every outgoing request.
pub const DEFAULT_SCOPE_HEADER: &str = "X-Shop-Id";

/// Key under which the active shop is persisted.
pub const DEFAULT_SCOPE_KEY: &str = "shop_id";

/// Session refresh endpoint (POST, no body, credentialed).
pub const DEFAULT_REFRESH_PATH: &str = "/auth/refresh";

/// Unauthenticated entry point the host is sent to on session teardown.
pub const DEFAULT_LOGIN_PATH: &str = "/login";

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SCOPE_STORE_FILE: &str = "shopwire.scope";

/// Message used when neither the server nor the transport said anything useful.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
