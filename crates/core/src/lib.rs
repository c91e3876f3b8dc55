//! # Shopwire Core
//!
//! The authenticated request pipeline - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for the transport, scope storage, and host application
//! - The scoped-context store (active shop, mirrored in memory)
//! - The single-flight session refresh coordinator
//! - The request dispatcher and error normalizer
//!
//! ## Architecture Principles
//! - Only depends on `shopwire-domain`
//! - No HTTP client or filesystem code
//! - All external effects via traits, injected as `Arc<dyn _>`
//! - Shared state lives in explicit instances, never globals

pub mod dispatch;
pub mod scope;
pub mod session;

// Infrastructure ports
pub mod transport_ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{DispatchSettings, ErrorNormalizer, RequestDispatcher};
pub use scope::{InMemoryScopeStorage, ScopeStorage, ScopedContextStore};
pub use session::{RefreshCoordinator, SessionHost, SessionTerminator};
pub use transport_ports::Transport;
