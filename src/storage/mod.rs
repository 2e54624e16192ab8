//! Persistence behind a key/value seam.
//!
//! The flow engine never touches storage directly: drafts and the template
//! library go through `KeyValueStore`, which has an in-memory implementation
//! for tests and a directory-backed one for real use.

use crate::error::StorageError;

mod drafts;
mod file;
mod memory;
mod templates;

pub use drafts::{Draft, DraftStore, draft_key};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use templates::{
    COMPLETED_TEMPLATES_KEY, SAVED_TEMPLATES_KEY, TEMPLATE_DRAFTS_KEY, TemplateLibrary,
    TemplateSort, TemplateStatusFilter,
};

/// Durable string storage addressed by key. Values are JSON documents.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&mut self, key: &str) -> Result<(), StorageError>;
    /// All stored keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StorageError>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).put(key, value)
    }

    fn delete(&mut self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn keys(&self) -> Result<Vec<String>, StorageError> {
        (**self).keys()
    }
}
