//! # Shopwire Domain
//!
//! Data types shared by the request pipeline.
//!
//! This crate contains:
//! - Request and response shapes (`RequestConfig`, `Envelope`, `TransportResponse`)
//! - The active tenant identifier (`ScopeId`)
//! - Error types (`NormalizedError`, `TransportError`, `ShopwireError`)
//! - Client configuration structures and constants
//!
//! ## Architecture
//! - No dependencies on other Shopwire crates
//! - No I/O; everything here is plain data

pub mod config;
pub mod constants;
pub mod errors;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
