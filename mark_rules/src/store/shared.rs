//! Thread-safe handle to a mark store for hosts that edit and simulate on different threads.

use std::sync::{Arc, RwLock};

use super::MarkStore;

/// A single-writer handle around a [`MarkStore`].
///
/// Readers take a [`snapshot`](SharedMarkStore::snapshot) once per tick so they never see
/// a mark halfway through an edit.
#[derive(Debug, Clone, Default)]
pub struct SharedMarkStore {
    inner: Arc<RwLock<MarkStore>>,
}

impl SharedMarkStore {
    /// Create a new shared handle owning `store`.
    pub fn new(store: MarkStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Run an edit under the writer lock.
    pub fn write<R>(&self, edit: impl FnOnce(&mut MarkStore) -> R) -> R {
        // A panicked writer leaves the map itself intact, so keep serving it.
        let mut guard = self.inner.write().unwrap_or_else(|poisoned| poisoned.into_inner());
        edit(&mut *guard)
    }

    /// Read under the shared lock without cloning.
    pub fn read<R>(&self, view: impl FnOnce(&MarkStore) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        view(&*guard)
    }

    /// Clone the current store for one evaluation tick.
    pub fn snapshot(&self) -> MarkStore {
        self.read(MarkStore::clone)
    }
}

impl From<MarkStore> for SharedMarkStore {
    fn from(store: MarkStore) -> Self {
        Self::new(store)
    }
}
