//! In-memory blob registry addressed by `blob:` object URLs.
//!
//! Uploaded files and the temporary artifacts of an export live here.
//! Export code holds its URLs through [`ScopedObjectUrl`], which revokes
//! the entry when it goes out of scope, whichever way the export ends.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::trace;
use uuid::Uuid;

/// URL prefix of every object URL minted by the store.
pub const OBJECT_URL_PREFIX: &str = "blob:qrstudio/";

/// Bytes plus their MIME type.
#[derive(Debug, PartialEq, Eq)]
pub struct Blob {
    pub mime: String,
    pub bytes: Vec<u8>,
}

/// Registry of live object URLs.
///
/// Not `Sync`: the pipeline runs on one thread and scoped guards revoke
/// through a shared reference.
#[derive(Debug, Default)]
pub struct ObjectUrlStore {
    blobs: RefCell<HashMap<String, Rc<Blob>>>,
}

impl ObjectUrlStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `bytes` and returns a fresh `blob:` URL for them.
    pub fn create(&self, bytes: Vec<u8>, mime: impl Into<String>) -> String {
        let url = format!("{OBJECT_URL_PREFIX}{}", Uuid::new_v4());
        let blob = Blob {
            mime: mime.into(),
            bytes,
        };
        trace!(%url, mime = %blob.mime, len = blob.bytes.len(), "created object URL");
        self.blobs.borrow_mut().insert(url.clone(), Rc::new(blob));
        url
    }

    /// Like [`create`](Self::create), but revoked when the guard drops.
    pub fn create_scoped(&self, bytes: Vec<u8>, mime: impl Into<String>) -> ScopedObjectUrl<'_> {
        let url = self.create(bytes, mime);
        ScopedObjectUrl { store: self, url }
    }

    pub fn resolve(&self, url: &str) -> Option<Rc<Blob>> {
        self.blobs.borrow().get(url).cloned()
    }

    /// Releases `url`. Returns whether it was live.
    pub fn revoke(&self, url: &str) -> bool {
        let removed = self.blobs.borrow_mut().remove(url).is_some();
        if removed {
            trace!(%url, "revoked object URL");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.blobs.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.borrow().is_empty()
    }
}

/// An object URL revoked on drop.
#[derive(Debug)]
pub struct ScopedObjectUrl<'a> {
    store: &'a ObjectUrlStore,
    url: String,
}

impl ScopedObjectUrl<'_> {
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn resolve(&self) -> Option<Rc<Blob>> {
        self.store.resolve(&self.url)
    }
}

impl Drop for ScopedObjectUrl<'_> {
    fn drop(&mut self) {
        self.store.revoke(&self.url);
    }
}
