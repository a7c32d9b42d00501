//! Directory-based storage backend for persistent stores.
//!
//! File system layout:
//!
//! ```text
//! <store_path>/
//! ├─ LOCK                 # Advisory lock for single-writer
//! ├─ categories.json      # One document file per collection key
//! ├─ courses.json
//! └─ ...
//! ```
//!
//! The LOCK file ensures only one process writes the store at a time.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use fs2::FileExt;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOCK_FILE: &str = "LOCK";
const DOC_EXTENSION: &str = "json";

/// A directory-based storage backend.
///
/// Each key maps to one `<key>.json` file inside the store directory.
/// Writes go through a temporary file and a rename, so a reader never
/// observes a half-written document and a failed write leaves the
/// previous document intact.
///
/// # Single Writer
///
/// Opening the backend acquires an exclusive advisory lock on a LOCK file
/// in the directory. A second open of the same directory fails with
/// [`StorageError::Locked`] while the first handle is alive.
///
/// # Example
///
/// ```rust,no_run
/// use eduboard_storage::{StorageBackend, DirBackend};
/// use std::path::Path;
///
/// let mut backend = DirBackend::open(Path::new("eduboard_data")).unwrap();
/// backend.save("categories", b"[]").unwrap();
/// ```
#[derive(Debug)]
pub struct DirBackend {
    /// Root directory path.
    path: PathBuf,
    /// Lock file handle (held for exclusive access).
    _lock_file: File,
}

impl DirBackend {
    /// Opens or creates a store directory.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The path exists but is not a directory
    /// - Another process holds the lock (returns [`StorageError::Locked`])
    /// - I/O errors occur
    pub fn open(path: &Path) -> StorageResult<Self> {
        if !path.exists() {
            fs::create_dir_all(path)?;
        }

        if !path.is_dir() {
            return Err(StorageError::invalid_path(format!(
                "path is not a directory: {}",
                path.display()
            )));
        }

        let lock_path = path.join(LOCK_FILE);
        let lock_file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        // Non-blocking: a held lock means another live store handle
        if lock_file.try_lock_exclusive().is_err() {
            return Err(StorageError::Locked);
        }

        Ok(Self {
            path: path.to_path_buf(),
            _lock_file: lock_file,
        })
    }

    /// Returns the path to the store directory.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Maps a key to its document file path, rejecting keys that could
    /// escape the store directory.
    fn doc_path(&self, key: &str) -> StorageResult<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
        if !valid {
            return Err(StorageError::invalid_key(key));
        }
        Ok(self.path.join(format!("{key}.{DOC_EXTENSION}")))
    }
}

impl StorageBackend for DirBackend {
    fn load(&self, key: &str) -> StorageResult<Option<Vec<u8>>> {
        let doc_path = self.doc_path(key)?;
        match fs::read(&doc_path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&mut self, key: &str, data: &[u8]) -> StorageResult<()> {
        let doc_path = self.doc_path(key)?;
        let temp_path = self.path.join(format!("{key}.{DOC_EXTENSION}.tmp"));

        // Write to temp, sync, then rename for atomic replacement
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, &doc_path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> StorageResult<()> {
        let doc_path = self.doc_path(key)?;
        match fs::remove_file(&doc_path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut keys = Vec::new();
        for entry in fs::read_dir(&self.path)? {
            let entry = entry?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some(DOC_EXTENSION) {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    keys.push(stem.to_string());
                }
            }
        }
        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let mut backend = DirBackend::open(temp.path()).unwrap();

        backend.save("categories", b"[{\"id\":1}]").unwrap();
        assert_eq!(
            backend.load("categories").unwrap(),
            Some(b"[{\"id\":1}]".to_vec())
        );
    }

    #[test]
    fn absent_key_is_none() {
        let temp = tempdir().unwrap();
        let backend = DirBackend::open(temp.path()).unwrap();
        assert_eq!(backend.load("missing").unwrap(), None);
    }

    #[test]
    fn documents_survive_reopen() {
        let temp = tempdir().unwrap();
        let store_path = temp.path().join("store");

        {
            let mut backend = DirBackend::open(&store_path).unwrap();
            backend.save("users", b"[\"alice\"]").unwrap();
        }

        let backend = DirBackend::open(&store_path).unwrap();
        assert_eq!(
            backend.load("users").unwrap(),
            Some(b"[\"alice\"]".to_vec())
        );
    }

    #[test]
    fn second_open_is_locked() {
        let temp = tempdir().unwrap();
        let _held = DirBackend::open(temp.path()).unwrap();

        let result = DirBackend::open(temp.path());
        assert!(matches!(result, Err(StorageError::Locked)));
    }

    #[test]
    fn lock_released_on_drop() {
        let temp = tempdir().unwrap();
        {
            let _backend = DirBackend::open(temp.path()).unwrap();
        }
        assert!(DirBackend::open(temp.path()).is_ok());
    }

    #[test]
    fn rejects_path_traversal_keys() {
        let temp = tempdir().unwrap();
        let backend = DirBackend::open(temp.path()).unwrap();

        assert!(matches!(
            backend.load("../escape"),
            Err(StorageError::InvalidKey { .. })
        ));
        assert!(matches!(
            backend.load(""),
            Err(StorageError::InvalidKey { .. })
        ));
    }

    #[test]
    fn keys_ignores_lock_and_temp_files() {
        let temp = tempdir().unwrap();
        let mut backend = DirBackend::open(temp.path()).unwrap();

        backend.save("a", b"1").unwrap();
        backend.save("b", b"2").unwrap();

        let mut keys = backend.keys().unwrap();
        keys.sort();
        assert_eq!(keys, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn remove_deletes_document() {
        let temp = tempdir().unwrap();
        let mut backend = DirBackend::open(temp.path()).unwrap();

        backend.save("k", b"v").unwrap();
        backend.remove("k").unwrap();
        assert_eq!(backend.load("k").unwrap(), None);

        // Removing an absent key is a no-op
        backend.remove("k").unwrap();
    }
}
