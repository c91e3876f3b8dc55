//! Host application adapters

pub mod host;

pub use host::WatchSessionHost;
