//! Domain types
//!
//! Everything the request pipeline passes between its components.

pub mod envelope;
pub mod normalized;
pub mod request;
pub mod scope;
pub mod transport;

pub use envelope::{server_message, Envelope};
pub use normalized::{ErrorClassification, FailureCause, NormalizedError};
pub use request::RequestConfig;
pub use scope::ScopeId;
pub use transport::{TransportError, TransportResponse};
