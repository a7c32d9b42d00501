//! Ordered, id-unique entity collections with persist-on-mutation.

use crate::error::{StoreError, StoreResult};
use crate::model::{Entity, HasStatus};
use crate::types::RecordId;
use eduboard_storage::StorageBackend;
use parking_lot::RwLock;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

/// The backend handle shared by all collections of one store.
pub(crate) type SharedBackend = Arc<RwLock<Box<dyn StorageBackend>>>;

/// An ordered collection of records of one entity kind.
///
/// Records keep their insertion order, which is the default display order.
/// Every successful mutation persists the collection's full JSON snapshot
/// under its storage key (whole-document overwrite). Reads hand out
/// cloned snapshots — no mutable reference to the live data ever escapes.
///
/// # Persistence failures
///
/// A failed save is reported as [`StoreError::Storage`] *after* the
/// in-memory mutation has been applied; the caller can retry the save (any
/// later successful mutation rewrites the whole document) without losing
/// the edit.
pub(crate) struct Collection<T: Entity> {
    /// Storage key of this collection.
    key: &'static str,
    /// Live records in insertion order.
    records: RwLock<Vec<T>>,
    /// Shared persistence backend.
    backend: SharedBackend,
}

impl<T: Entity> Collection<T> {
    /// Loads a collection from the backend.
    ///
    /// An absent key means "first run": the caller-supplied default (seed
    /// data) is used and persisted best-effort. A corrupt or unreadable
    /// document also falls back to the default, with a warning — the
    /// store must stay usable.
    pub(crate) fn load(key: &'static str, backend: SharedBackend, default: Vec<T>) -> Self {
        let (records, fell_back) = match backend.read().load(key) {
            Ok(Some(bytes)) => match serde_json::from_slice::<Vec<T>>(&bytes) {
                Ok(records) => {
                    debug!(collection = key, count = records.len(), "loaded collection");
                    (records, false)
                }
                Err(e) => {
                    warn!(collection = key, error = %e, "corrupt document, using default");
                    (default, true)
                }
            },
            Ok(None) => {
                debug!(collection = key, count = default.len(), "seeding collection");
                (default, true)
            }
            Err(e) => {
                warn!(collection = key, error = %e, "unreadable document, using default");
                (default, true)
            }
        };

        let collection = Self {
            key,
            records: RwLock::new(records),
            backend,
        };

        // Best-effort write so the seed survives a session with no edits;
        // an empty default has nothing worth writing yet
        if fell_back && !collection.is_empty() {
            if let Err(e) = collection.persist(&collection.records.read()) {
                warn!(collection = key, error = %e, "could not persist initial snapshot");
            }
        }

        collection
    }

    /// Inserts a record, preserving insertion order.
    ///
    /// Validates the record and rejects duplicate ids before any state
    /// changes. Returns the stored record.
    pub(crate) fn add(&self, record: T) -> StoreResult<T> {
        record.validate()?;

        let mut records = self.records.write();
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(StoreError::validation(format!(
                "duplicate id {} in {}",
                record.id(),
                self.key
            )));
        }

        records.push(record.clone());
        self.persist(&records)?;
        Ok(record)
    }

    /// Shallow-merges a JSON patch into the record with the given id.
    ///
    /// Fields present in the patch replace their counterparts; all other
    /// fields are untouched. The `id` field is immutable and a patch that
    /// names it is rejected. Returns the updated record.
    pub(crate) fn update(&self, id: RecordId, patch: Value) -> StoreResult<T> {
        let Value::Object(patch) = patch else {
            return Err(StoreError::validation("patch must be a JSON object"));
        };
        if patch.contains_key("id") {
            return Err(StoreError::validation("record id is immutable"));
        }

        let mut records = self.records.write();
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(self.key, id))?;

        let mut doc = serde_json::to_value(&records[pos])?;
        let Value::Object(ref mut fields) = doc else {
            return Err(StoreError::validation(format!(
                "{} record did not serialize to an object",
                self.key
            )));
        };
        for (field, value) in patch {
            fields.insert(field, value);
        }

        let updated: T = serde_json::from_value(doc)?;
        updated.validate()?;

        records[pos] = updated.clone();
        self.persist(&records)?;
        Ok(updated)
    }

    /// Applies a typed in-place edit to the record with the given id.
    ///
    /// Same persistence and `NotFound` semantics as [`Collection::update`];
    /// used by façade operations that fan out into structured edits.
    pub(crate) fn modify(&self, id: RecordId, f: impl FnOnce(&mut T)) -> StoreResult<T> {
        let mut records = self.records.write();
        let pos = records
            .iter()
            .position(|r| r.id() == id)
            .ok_or_else(|| StoreError::not_found(self.key, id))?;

        let mut updated = records[pos].clone();
        f(&mut updated);
        updated.validate()?;

        records[pos] = updated.clone();
        self.persist(&records)?;
        Ok(updated)
    }

    /// Removes the record with the given id.
    ///
    /// Returns whether a removal occurred. No cascading delete: dependent
    /// records in other collections are left untouched.
    pub(crate) fn remove(&self, id: RecordId) -> StoreResult<bool> {
        let mut records = self.records.write();
        let before = records.len();
        records.retain(|r| r.id() != id);

        if records.len() == before {
            return Ok(false);
        }
        self.persist(&records)?;
        Ok(true)
    }

    /// Removes the record with the given id, reporting `NotFound` if
    /// nothing was removed.
    pub(crate) fn remove_required(&self, id: RecordId) -> StoreResult<()> {
        if self.remove(id)? {
            Ok(())
        } else {
            Err(StoreError::not_found(self.key, id))
        }
    }

    /// Returns a snapshot of all records in insertion order.
    pub(crate) fn list(&self) -> Vec<T> {
        self.records.read().clone()
    }

    /// Returns a snapshot of the record with the given id.
    pub(crate) fn get(&self, id: RecordId) -> Option<T> {
        self.records.read().iter().find(|r| r.id() == id).cloned()
    }

    /// Like [`Collection::get`], but reports `NotFound` for absent ids.
    pub(crate) fn get_required(&self, id: RecordId) -> StoreResult<T> {
        self.get(id).ok_or_else(|| StoreError::not_found(self.key, id))
    }

    /// Returns the number of records.
    pub(crate) fn len(&self) -> usize {
        self.records.read().len()
    }

    /// Whether the collection has no records.
    pub(crate) fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    /// Writes the full snapshot to the backend.
    fn persist(&self, records: &[T]) -> StoreResult<()> {
        let bytes = serde_json::to_vec(records)?;
        self.backend.write().save(self.key, &bytes)?;
        debug!(collection = self.key, count = records.len(), "persisted collection");
        Ok(())
    }
}

impl<T: Entity + HasStatus> Collection<T> {
    /// Toggles `Active ⇄ Disabled` on the record with the given id.
    pub(crate) fn toggle_status(&self, id: RecordId) -> StoreResult<T> {
        self.modify(id, |record| {
            let next = record.status().toggled();
            record.set_status(next);
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use crate::types::Status;
    use eduboard_storage::{MemoryBackend, StorageError, StorageResult};
    use proptest::prelude::*;
    use serde_json::json;

    fn shared(backend: impl StorageBackend + 'static) -> SharedBackend {
        Arc::new(RwLock::new(Box::new(backend) as Box<dyn StorageBackend>))
    }

    fn empty_collection() -> Collection<Category> {
        Collection::load("categories", shared(MemoryBackend::new()), Vec::new())
    }

    /// Backend whose saves always fail, for persistence-failure semantics.
    struct BrokenBackend;

    impl StorageBackend for BrokenBackend {
        fn load(&self, _key: &str) -> StorageResult<Option<Vec<u8>>> {
            Ok(None)
        }
        fn save(&mut self, _key: &str, _data: &[u8]) -> StorageResult<()> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
        fn remove(&mut self, _key: &str) -> StorageResult<()> {
            Ok(())
        }
        fn keys(&self) -> StorageResult<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn add_appends_in_insertion_order() {
        let collection = empty_collection();
        collection.add(Category::new("First")).unwrap();
        collection.add(Category::new("Second")).unwrap();
        collection.add(Category::new("Third")).unwrap();

        let names: Vec<String> = collection.list().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
    }

    #[test]
    fn add_rejects_blank_name() {
        let collection = empty_collection();
        let result = collection.add(Category::new("  "));
        assert!(matches!(result, Err(StoreError::Validation { .. })));
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn add_rejects_duplicate_id() {
        let collection = empty_collection();
        let category = collection.add(Category::new("Design")).unwrap();

        let duplicate = Category {
            id: category.id,
            ..Category::new("Other")
        };
        assert!(matches!(
            collection.add(duplicate),
            Err(StoreError::Validation { .. })
        ));
    }

    #[test]
    fn update_merges_only_patched_fields() {
        let collection = empty_collection();
        let category = collection.add(Category::new("Development")).unwrap();

        let updated = collection
            .update(category.id, json!({"name": "Web Development"}))
            .unwrap();

        assert_eq!(updated.name, "Web Development");
        // Unpatched fields keep their pre-update values
        assert_eq!(updated.id, category.id);
        assert_eq!(updated.status, category.status);
    }

    #[test]
    fn update_rejects_id_patch() {
        let collection = empty_collection();
        let category = collection.add(Category::new("Design")).unwrap();

        let result = collection.update(category.id, json!({"id": RecordId::new()}));
        assert!(matches!(result, Err(StoreError::Validation { .. })));
    }

    #[test]
    fn update_missing_id_is_not_found() {
        let collection = empty_collection();
        let result = collection.update(RecordId::new(), json!({"name": "x"}));
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn remove_reports_whether_anything_happened() {
        let collection = empty_collection();
        let category = collection.add(Category::new("Design")).unwrap();

        assert!(collection.remove(category.id).unwrap());
        assert!(!collection.remove(category.id).unwrap());
        assert_eq!(collection.len(), 0);
    }

    #[test]
    fn remove_required_reports_not_found() {
        let collection = empty_collection();
        let result = collection.remove_required(RecordId::new());
        assert!(matches!(result, Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn toggle_status_twice_restores_original() {
        let collection = empty_collection();
        let category = collection.add(Category::new("Design")).unwrap();
        assert_eq!(category.status, Status::Active);

        let once = collection.toggle_status(category.id).unwrap();
        assert_eq!(once.status, Status::Disabled);

        let twice = collection.toggle_status(category.id).unwrap();
        assert_eq!(twice.status, category.status);
    }

    #[test]
    fn roundtrips_through_backend() {
        let backend = shared(MemoryBackend::new());
        let id;
        {
            let collection: Collection<Category> =
                Collection::load("categories", Arc::clone(&backend), Vec::new());
            id = collection.add(Category::new("Design")).unwrap().id;
            collection.add(Category::new("Marketing")).unwrap();
        }

        let reloaded: Collection<Category> =
            Collection::load("categories", backend, Vec::new());
        assert_eq!(reloaded.len(), 2);
        assert_eq!(reloaded.get(id).unwrap().name, "Design");
    }

    #[test]
    fn corrupt_document_falls_back_to_default() {
        let backend = shared(MemoryBackend::new());
        backend
            .write()
            .save("categories", b"this is not json")
            .unwrap();

        let seed = vec![Category::new("Seeded")];
        let collection: Collection<Category> =
            Collection::load("categories", backend, seed);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.list()[0].name, "Seeded");
    }

    #[test]
    fn failed_save_keeps_in_memory_mutation() {
        let collection: Collection<Category> =
            Collection::load("categories", shared(BrokenBackend), Vec::new());

        let result = collection.add(Category::new("Design"));
        assert!(matches!(result, Err(StoreError::Storage(_))));

        // The mutation is retained so the caller can retry the save
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.list()[0].name, "Design");
    }

    proptest! {
        #[test]
        fn added_ids_are_always_unique(names in proptest::collection::vec("[a-z]{1,8}", 1..40)) {
            let collection = empty_collection();
            for name in names {
                collection.add(Category::new(name)).unwrap();
            }

            let ids: Vec<RecordId> = collection.list().into_iter().map(|c| c.id).collect();
            let mut deduped = ids.clone();
            deduped.sort();
            deduped.dedup();
            prop_assert_eq!(ids.len(), deduped.len());
        }

        #[test]
        fn patch_never_touches_unnamed_fields(name in "[A-Za-z]{1,16}") {
            let collection = empty_collection();
            let before = collection.add(Category::new("Original")).unwrap();
            collection.toggle_status(before.id).unwrap();

            let after = collection.update(before.id, json!({"name": name.clone()})).unwrap();
            prop_assert_eq!(after.name, name);
            prop_assert_eq!(after.id, before.id);
            prop_assert_eq!(after.status, Status::Disabled);
        }
    }
}
