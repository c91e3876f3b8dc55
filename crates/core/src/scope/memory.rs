//! Process-local scope storage

use std::sync::Arc;

use parking_lot::Mutex;
use shopwire_domain::Result;

use super::ports::ScopeStorage;

/// Process-local [`ScopeStorage`], for tests and hosts without durable state.
///
/// Clones share the same slot, so a fresh [`super::ScopedContextStore`] built
/// from a clone behaves like a reload.
#[derive(Debug, Clone, Default)]
pub struct InMemoryScopeStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl InMemoryScopeStorage {
    /// Empty storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage that starts with a persisted value.
    pub fn with_value(value: impl Into<String>) -> Self {
        Self { slot: Arc::new(Mutex::new(Some(value.into()))) }
    }

    /// The raw persisted value.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().clone()
    }
}

impl ScopeStorage for InMemoryScopeStorage {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().clone())
    }

    fn store(&self, value: &str) -> Result<()> {
        *self.slot.lock() = Some(value.to_string());
        Ok(())
    }

    fn remove(&self) -> Result<()> {
        self.slot.lock().take();
        Ok(())
    }
}
