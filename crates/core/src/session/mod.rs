//! Session lifecycle
//!
//! Refreshing an expired session (single-flight) and tearing the session down
//! when it cannot be recovered.

pub mod ports;
pub mod refresh;
pub mod terminator;

pub use ports::SessionHost;
pub use refresh::RefreshCoordinator;
pub use terminator::SessionTerminator;
