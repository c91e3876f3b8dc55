//! # Shopwire Infrastructure
//!
//! Infrastructure implementations of the core pipeline ports.
//!
//! This crate contains:
//! - The reqwest-backed [`HttpTransport`]
//! - File-backed durable scope storage
//! - A watch-channel session host for embedding applications
//! - Configuration loading and tracing setup
//! - [`ApiClient`], the composition root wiring it all together
//!
//! ## Architecture
//! - Implements traits defined in `shopwire-core`
//! - Contains all "impure" code (network, filesystem, process environment)

pub mod api;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;
pub mod session;
pub mod storage;

// Re-export commonly used items
pub use api::{ApiClient, ApiClientBuilder};
pub use http::{HttpTransport, HttpTransportBuilder};
pub use session::WatchSessionHost;
pub use storage::FileScopeStorage;
