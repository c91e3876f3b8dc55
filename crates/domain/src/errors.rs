//! Error types used outside the request path
//!
//! Request failures surface as [`crate::NormalizedError`]; this type covers
//! configuration, storage, and invalid caller input.

use thiserror::Error;

/// Main error type for Shopwire
#[derive(Error, Debug)]
pub enum ShopwireError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias for Shopwire operations
pub type Result<T> = std::result::Result<T, ShopwireError>;
