//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use parking_lot::RwLock;
use std::collections::HashMap;

/// An in-memory storage backend.
///
/// This backend stores all documents in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// # Thread Safety
///
/// This backend is thread-safe and can be shared across threads.
///
/// # Example
///
/// ```rust
/// use eduboard_storage::{StorageBackend, MemoryBackend};
///
/// let mut backend = MemoryBackend::new();
/// backend.save("users", b"[]").unwrap();
/// assert_eq!(backend.load("users").unwrap(), Some(b"[]".to_vec()));
/// ```
#[derive(Debug, Default)]
pub struct MemoryBackend {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a backend pre-populated with documents.
    ///
    /// Useful for testing load/recovery paths.
    #[must_use]
    pub fn with_documents(documents: HashMap<String, Vec<u8>>) -> Self {
        Self {
            documents: RwLock::new(documents),
        }
    }

    /// Clears all documents from the backend.
    pub fn clear(&mut self) {
        self.documents.write().clear();
    }

    /// Returns the number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    /// Returns `true` if no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

impl StorageBackend for MemoryBackend {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        Ok(self.documents.read().get(key).cloned())
    }

    fn save(&mut self, key: &str, data: &[u8]) -> StorageResult<()> {
        self.documents.write().insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        self.documents.write().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.documents.read().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn save_and_load_roundtrip() {
        let mut backend = MemoryBackend::new();
        backend.save("categories", b"[1,2,3]").unwrap();
        assert_eq!(
            backend.load("categories").unwrap(),
            Some(b"[1,2,3]".to_vec())
        );
    }

    #[test]
    fn absent_key_is_none() {
        let backend = MemoryBackend::new();
        assert_eq!(backend.load("missing").unwrap(), None);
    }

    #[test]
    fn save_overwrites() {
        let mut backend = MemoryBackend::new();
        backend.save("k", b"old").unwrap();
        backend.save("k", b"new").unwrap();
        assert_eq!(backend.load("k").unwrap(), Some(b"new".to_vec()));
    }

    #[test]
    fn remove_key() {
        let mut backend = MemoryBackend::new();
        backend.save("k", b"v").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.load("k").unwrap(), None);

        // Removing again is a no-op
        backend.remove("k").unwrap();
    }

    #[test]
    fn keys_lists_saved_documents() {
        let mut backend = MemoryBackend::new();
        backend.save("a", b"1").unwrap();
        backend.save("b", b"2").unwrap();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn clear_empties_backend() {
        let mut backend = MemoryBackend::new();
        backend.save("a", b"1").unwrap();
        assert!(!backend.is_empty());
        backend.clear();
        assert!(backend.is_empty());
    }
}
