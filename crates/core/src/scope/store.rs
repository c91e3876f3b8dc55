//! In-memory mirror of the durable scope slot

use std::sync::Arc;

use parking_lot::RwLock;
use shopwire_domain::{Result, ScopeId};
use tracing::{debug, info, warn};

use super::ports::ScopeStorage;

/// Holds the active shop id.
///
/// The durable store is read once at construction; afterwards `get` is a
/// cached read. `set` writes through to storage before updating memory, under
/// the same lock, so the two never disagree.
pub struct ScopedContextStore {
    storage: Arc<dyn ScopeStorage>,
    current: RwLock<Option<ScopeId>>,
}

impl ScopedContextStore {
    /// Create the store and load the persisted value.
    ///
    /// A storage read failure or a blank persisted value starts the store
    /// unset rather than failing construction.
    pub fn new(storage: Arc<dyn ScopeStorage>) -> Self {
        let initial = match storage.load() {
            Ok(raw) => raw.as_deref().and_then(ScopeId::parse),
            Err(e) => {
                warn!(error = %e, "Failed to load persisted scope, starting unset");
                None
            }
        };

        debug!(scope = ?initial.as_ref().map(ScopeId::as_str), "Scope store initialized");

        Self { storage, current: RwLock::new(initial) }
    }

    /// Current shop id, if one is selected.
    pub fn get(&self) -> Option<ScopeId> {
        self.current.read().clone()
    }

    /// Select a shop, or clear the selection with `None`.
    ///
    /// # Errors
    /// Returns the storage error; memory is left unchanged in that case.
    pub fn set(&self, scope: Option<ScopeId>) -> Result<()> {
        let mut current = self.current.write();

        match &scope {
            Some(id) => self.storage.store(id.as_str())?,
            None => self.storage.remove()?,
        }

        info!(scope = ?scope.as_ref().map(ScopeId::as_str), "Active scope changed");
        *current = scope;
        Ok(())
    }

    /// Shorthand for `set(None)`.
    ///
    /// # Errors
    /// Returns the storage error if the entry cannot be removed.
    pub fn clear(&self) -> Result<()> {
        self.set(None)
    }
}
