//! Entity models for the back-office catalog, people, commerce, and
//! engagement domains.
//!
//! All monetary amounts are in minor currency units (cents).

use crate::error::StoreResult;
use crate::types::{RecordId, Status};
use serde::de::DeserializeOwned;
use serde::Serialize;

mod category;
mod commerce;
mod course;
mod engagement;
mod enrollment;
mod people;
mod quiz;

pub use category::Category;
pub use commerce::{Referral, SubscriptionPlan};
pub use course::{Course, Lesson, PriceType, Section};
pub use engagement::{Comment, Reply, Review, Short, Slider};
pub use enrollment::{
    AccessType, CertificateConfig, CertificateElement, CertificateElements, Enrollment,
    EnrollmentKind, Payment, PaymentStatus,
};
pub use people::{
    AcademicInfo, Instructor, ReferralData, SocialLinks, StudentDetails, User, Wallet,
    WalletTransaction, WalletTxnKind,
};
pub use quiz::{Answer, Attempt, PassStatus, Question, Quiz};

/// A record that can live in a [`crate::collection::Collection`].
///
/// Implementors are plain serde-serializable structs whose `id` is assigned
/// by their constructor and never changes afterwards.
pub trait Entity:
    Clone + std::fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// The record's immutable identifier.
    fn id(&self) -> RecordId;

    /// Validates required fields before the record is inserted.
    ///
    /// The default accepts everything; entities with required fields
    /// override this to reject blank input before any mutation happens.
    fn validate(&self) -> StoreResult<()> {
        Ok(())
    }
}

/// A record with an `Active ⇄ Disabled` lifecycle.
pub trait HasStatus {
    /// Returns the current status.
    fn status(&self) -> Status;

    /// Replaces the status.
    fn set_status(&mut self, status: Status);
}

pub(crate) fn require_non_empty(value: &str, field: &str) -> StoreResult<()> {
    if value.trim().is_empty() {
        Err(crate::error::StoreError::validation(format!(
            "{field} must not be empty"
        )))
    } else {
        Ok(())
    }
}
