//! Error and warning types for the Eduboard store.

use crate::types::RecordId;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in store operations.
///
/// Nothing in this taxonomy terminates the process. `NotFound` and
/// `Validation` are returned before any state changes; `Storage` is
/// reported *after* the in-memory mutation has been applied, so the
/// caller can retry the save without losing the edit.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A required field was missing or malformed; nothing was persisted.
    #[error("validation failed: {message}")]
    Validation {
        /// Description of the rejected input.
        message: String,
    },

    /// An update or removal targeted an id that is not in the collection.
    #[error("no {collection} record with id {id}")]
    NotFound {
        /// The collection that was searched.
        collection: &'static str,
        /// The id that was not found.
        id: RecordId,
    },

    /// The persistence backend failed. The in-memory mutation, if any,
    /// has already been applied and is retained.
    #[error("storage error: {0}")]
    Storage(#[from] eduboard_storage::StorageError),

    /// A document could not be serialized or a patch could not be applied.
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),
}

impl StoreError {
    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates a not-found error.
    pub fn not_found(collection: &'static str, id: RecordId) -> Self {
        Self::NotFound { collection, id }
    }
}

/// Non-fatal data-integrity findings.
///
/// Warnings are reported (and logged via `tracing::warn!`) but never block
/// an operation: the store stays usable with drifted or orphaned data.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IntegrityWarning {
    /// A stored wallet balance disagrees with `earnings - withdrawn`.
    #[error("wallet drift for user {user_id}: stored {stored}, computed {computed}")]
    WalletDrift {
        /// The affected user.
        user_id: RecordId,
        /// The balance as stored on the record.
        stored: i64,
        /// The authoritative `earnings - withdrawn` value.
        computed: i64,
    },

    /// An enrollment references a course that no longer exists.
    #[error("enrollment {enrollment_id} references missing course ({item_name:?})")]
    OrphanedEnrollment {
        /// The dangling enrollment.
        enrollment_id: RecordId,
        /// The display name copied at enrollment time.
        item_name: String,
    },

    /// A course references an instructor that no longer exists.
    #[error("course {course_id} references missing instructor ({instructor:?})")]
    OrphanedCourse {
        /// The dangling course.
        course_id: RecordId,
        /// The instructor display name on the course.
        instructor: String,
    },
}
