//! Shared store context
//!
//! A long-lived front end (e.g. a request server) holds one `SharedStore`
//! and passes it to every handler instead of keeping a global handle.
//!
//! ## Concurrency Model
//! Every operation, reads included, takes the same lock: a read may
//! materialize a resolution, which appends to the file and rewrites a slot,
//! so it is a writer as far as offsets are concerned.

use parking_lot::Mutex;

use crate::error::Result;
use crate::layout::Resolution;
use crate::store::{ImgStore, ListMode};

/// One store handle behind one mutex
pub struct SharedStore {
    store: Mutex<ImgStore>,
}

impl SharedStore {
    pub fn new(store: ImgStore) -> Self {
        Self {
            store: Mutex::new(store),
        }
    }

    pub fn insert(&self, buffer: &[u8], img_id: &str) -> Result<usize> {
        self.store.lock().insert(buffer, img_id)
    }

    pub fn read(&self, img_id: &str, res: Resolution) -> Result<Vec<u8>> {
        self.store.lock().read(img_id, res)
    }

    pub fn delete(&self, img_id: &str) -> Result<()> {
        self.store.lock().delete(img_id)
    }

    pub fn list(&self, mode: ListMode) -> Result<String> {
        self.store.lock().list(mode)
    }

    /// Run `f` with exclusive access to the handle
    pub fn with<R>(&self, f: impl FnOnce(&mut ImgStore) -> R) -> R {
        f(&mut self.store.lock())
    }

    /// Close the handle and give it back
    pub fn into_inner(self) -> ImgStore {
        self.store.into_inner()
    }
}
