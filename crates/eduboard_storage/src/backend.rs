//! Storage backend trait definition.

use crate::error::StorageResult;

/// A keyed byte store for collection documents.
///
/// Backends are **opaque byte stores**. Each key holds one whole serialized
/// document; `save` overwrites it entirely. Backends do not understand
/// entities, collections, or document formats — `eduboard_core` owns all
/// of that interpretation.
///
/// # Invariants
///
/// - `load` returns exactly the bytes most recently passed to `save` for
///   that key, or `None` if the key was never saved (or was removed)
/// - Absence of a key is a valid state, never an error
/// - `save` is atomic per key: a reader never observes a half-written
///   document
/// - Backends must be `Send + Sync` so a store handle can be shared
///
/// # Implementors
///
/// - [`super::MemoryBackend`] - For testing
/// - [`super::DirBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Loads the document stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent — callers use this to fall
    /// back to their default (seed) data.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or an I/O error occurs.
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>>;

    /// Saves `data` under `key`, overwriting any previous document.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or the write fails. A
    /// failed write leaves the previous document intact.
    fn save(&mut self, key: &str, data: &[u8]) -> StorageResult<()>;

    /// Removes the document stored under `key`, if any.
    ///
    /// Removing an absent key is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is malformed or an I/O error occurs.
    fn remove(&mut self, key: &str) -> StorageResult<()>;

    /// Returns all keys that currently hold a document.
    ///
    /// Order is unspecified.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be enumerated.
    fn keys(&self) -> StorageResult<Vec<String>>;
}
