//! Active shop context
//!
//! The selected shop id is read on every outgoing request, so it is cached in
//! memory and only written through to durable storage on change.

pub mod memory;
pub mod ports;
pub mod store;

pub use memory::InMemoryScopeStorage;
pub use ports::ScopeStorage;
pub use store::ScopedContextStore;
