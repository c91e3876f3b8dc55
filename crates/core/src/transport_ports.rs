//! Transport port
//!
//! One network round trip per call. Implementations must not retry, must not
//! interpret the body beyond exposing status and bytes, and must not route
//! through the dispatcher; calling a `Transport` directly is how the refresh
//! coordinator bypasses 401 interception.

use async_trait::async_trait;
use shopwire_domain::{RequestConfig, TransportError, TransportResponse};

/// Performs exactly one HTTP call for a request description.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return whatever the server answered.
    ///
    /// Any HTTP status, including 4xx/5xx, is an `Ok` response. `Err` is
    /// reserved for failures where no response exists.
    async fn call(&self, request: &RequestConfig) -> Result<TransportResponse, TransportError>;
}
