//! Observability
//!
//! Tracing subscriber setup for binaries embedding the pipeline. Library code
//! only emits `tracing` events; installing a subscriber is the host's call.

pub mod logging;

pub use logging::{build_filter, init_tracing};
