//! HTTP transport over reqwest

pub mod client;

pub use client::{HttpTransport, HttpTransportBuilder};
