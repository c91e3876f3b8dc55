//! Durable scope storage

pub mod file;

pub use file::FileScopeStorage;
