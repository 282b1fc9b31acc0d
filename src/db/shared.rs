use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::Result;
use crate::storage::StoreOptions;

use super::store::SocialStore;

/// A [`SocialStore`] behind one coarse read/write lock.
///
/// Any number of readers may run at once; a writer waits for them and blocks
/// new readers until it is done. Clones share the same store.
#[derive(Clone)]
pub struct SharedStore {
    inner: Arc<RwLock<SocialStore>>,
}

impl SharedStore {
    pub fn open(options: StoreOptions) -> Result<Self> {
        Ok(Self::new(SocialStore::open(options)?))
    }

    pub fn new(store: SocialStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Runs `f` under the shared lock.
    pub fn read<R>(&self, f: impl FnOnce(&SocialStore) -> R) -> R {
        let guard = self.inner.read();
        f(&guard)
    }

    /// Runs `f` under the exclusive lock.
    pub fn write<R>(&self, f: impl FnOnce(&mut SocialStore) -> R) -> R {
        let mut guard = self.inner.write();
        f(&mut guard)
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("SharedStore").field(&*self.inner.read()).finish()
    }
}
