//! Port interface for durable scope persistence

use shopwire_domain::Result;

/// Small durable key/value slot holding the active shop id.
///
/// Implementations own the key name and value encoding. Clearing must remove
/// the entry rather than store an empty value, so "unset" and "empty" never
/// look alike after a reload.
pub trait ScopeStorage: Send + Sync {
    /// Read the persisted raw value, if any.
    fn load(&self) -> Result<Option<String>>;

    /// Persist `value`, replacing any previous one.
    fn store(&self, value: &str) -> Result<()>;

    /// Remove the persisted entry. Removing a missing entry is not an error.
    fn remove(&self) -> Result<()>;
}
