//! Application-facing API client

pub mod client;

pub use client::{ApiClient, ApiClientBuilder};
