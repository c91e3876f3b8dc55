//! Request dispatch
//!
//! The public entry point of the pipeline and the error normalization it
//! funnels every failure through.

pub mod dispatcher;
pub mod normalizer;

pub use dispatcher::{DispatchSettings, RequestDispatcher};
pub use normalizer::ErrorNormalizer;
