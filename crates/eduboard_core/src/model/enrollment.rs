//! Enrollments: the commerce records linking users to catalog items.

use super::Entity;
use crate::error::StoreResult;
use crate::types::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};

/// Which catalog surface an enrollment belongs to.
///
/// Each kind lives in its own collection; the record shape is shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnrollmentKind {
    /// Course enrollment (joins to the courses collection).
    Course,
    /// Ebook purchase.
    Ebook,
    /// Job-board access.
    Job,
    /// Subscription-plan enrollment (joins to the plans collection).
    Subscription,
}

impl EnrollmentKind {
    /// Storage key of this kind's collection.
    #[must_use]
    pub const fn collection_key(self) -> &'static str {
        match self {
            Self::Course => "course_enrollments",
            Self::Ebook => "ebook_enrollments",
            Self::Job => "job_enrollments",
            Self::Subscription => "subscription_enrollments",
        }
    }
}

/// Commercial/completion state of an enrollment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessType {
    /// Granted without payment.
    Free,
    /// Paid and in progress.
    Paid,
    /// Finished; eligible for a certificate.
    Completed,
}

/// Settlement state of the enrollment payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    /// Payment settled.
    Paid,
    /// Payment initiated but not settled.
    Pending,
    /// Payment failed or was reversed.
    Failed,
}

/// Payment details supplied when creating an enrollment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payment {
    /// Amount actually charged, in cents.
    pub price: i64,
    /// List price at purchase time, in cents.
    pub original_price: i64,
    /// Gateway transaction reference.
    pub transaction_id: String,
    /// Payment channel ("UPI", "Card", "Wallet", ...).
    pub payment_mode: String,
    /// Settlement state.
    pub payment_status: PaymentStatus,
    /// Optional access expiry.
    pub expiry_date: Option<Timestamp>,
}

impl Payment {
    /// A zero-amount payment for free enrollments.
    #[must_use]
    pub fn free() -> Self {
        Self {
            price: 0,
            original_price: 0,
            transaction_id: String::new(),
            payment_mode: "None".to_string(),
            payment_status: PaymentStatus::Paid,
            expiry_date: None,
        }
    }
}

/// One positioned text element of a certificate layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateElement {
    /// The rendered text.
    pub text: String,
    /// Horizontal position, percent of certificate width.
    pub x_pct: f32,
    /// Vertical position, percent of certificate height.
    pub y_pct: f32,
    /// Font size in points.
    pub font_size: u16,
    /// Font family name.
    pub font_family: String,
    /// CSS-style color value.
    pub color: String,
    /// Font weight ("normal", "bold", "600", ...).
    pub font_weight: String,
    /// Letter spacing in points.
    pub letter_spacing: f32,
}

/// The three standard certificate elements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateElements {
    /// Recipient name element.
    pub name: CertificateElement,
    /// Course title element.
    pub course: CertificateElement,
    /// Issue date element.
    pub date: CertificateElement,
}

/// Certificate layout handed over by the certificate editor.
///
/// The store treats this as an opaque structure: it is stored on the
/// enrollment that triggered the certificate and returned verbatim, so
/// re-issuing edits that enrollment's config only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CertificateConfig {
    /// Positioned text elements.
    pub elements: CertificateElements,
    /// Background image asset reference.
    pub background_image: Option<String>,
}

/// A record linking a user to a purchased/accessed catalog item.
///
/// `item_id` is the explicit foreign key used for all joins; `item_name`
/// is the display copy made at enrollment time and is never matched on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Enrollment {
    /// Unique record id.
    pub id: RecordId,
    /// Which catalog surface this enrollment belongs to.
    pub kind: EnrollmentKind,
    /// Foreign key to the enrolling user.
    pub user_id: RecordId,
    /// User display name (denormalized copy).
    pub user_name: String,
    /// Foreign key to the catalog item, when it exists in the store
    /// (courses and subscription plans; ebooks/jobs are external).
    pub item_id: Option<RecordId>,
    /// Item display name (denormalized copy).
    pub item_name: String,
    /// Commercial/completion state.
    pub access: AccessType,
    /// Amount charged, in cents.
    pub price: i64,
    /// List price at purchase time, in cents.
    pub original_price: i64,
    /// Gateway transaction reference.
    pub transaction_id: String,
    /// Payment channel.
    pub payment_mode: String,
    /// Settlement state.
    pub payment_status: PaymentStatus,
    /// When the enrollment was created.
    pub enrolled_date: Timestamp,
    /// Optional access expiry.
    pub expiry_date: Option<Timestamp>,
    /// Whether a certificate has been generated for this enrollment.
    pub is_certificate_generated: bool,
    /// Certificate layout, present once a certificate was configured.
    pub certificate_config: Option<CertificateConfig>,
}

impl Enrollment {
    /// Creates a new enrollment record.
    pub fn new(
        kind: EnrollmentKind,
        user_id: RecordId,
        user_name: impl Into<String>,
        item_id: Option<RecordId>,
        item_name: impl Into<String>,
        access: AccessType,
        payment: Payment,
    ) -> Self {
        Self {
            id: RecordId::new(),
            kind,
            user_id,
            user_name: user_name.into(),
            item_id,
            item_name: item_name.into(),
            access,
            price: payment.price,
            original_price: payment.original_price,
            transaction_id: payment.transaction_id,
            payment_mode: payment.payment_mode,
            payment_status: payment.payment_status,
            enrolled_date: Timestamp::now(),
            expiry_date: payment.expiry_date,
            is_certificate_generated: false,
            certificate_config: None,
        }
    }
}

impl Entity for Enrollment {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        super::require_non_empty(&self.user_name, "enrollment user name")?;
        super::require_non_empty(&self.item_name, "enrollment item name")?;
        if self.price < 0 {
            return Err(crate::error::StoreError::validation(
                "enrollment price must not be negative",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_enrollment_has_no_certificate() {
        let e = Enrollment::new(
            EnrollmentKind::Course,
            RecordId::new(),
            "Priya",
            Some(RecordId::new()),
            "Rust in Practice",
            AccessType::Paid,
            Payment::free(),
        );
        assert!(!e.is_certificate_generated);
        assert!(e.certificate_config.is_none());
    }

    #[test]
    fn negative_price_fails_validation() {
        let mut e = Enrollment::new(
            EnrollmentKind::Ebook,
            RecordId::new(),
            "Priya",
            None,
            "Async Rust",
            AccessType::Paid,
            Payment::free(),
        );
        e.price = -100;
        assert!(e.validate().is_err());
    }

    #[test]
    fn collection_keys_are_distinct() {
        let keys = [
            EnrollmentKind::Course.collection_key(),
            EnrollmentKind::Ebook.collection_key(),
            EnrollmentKind::Job.collection_key(),
            EnrollmentKind::Subscription.collection_key(),
        ];
        for (i, a) in keys.iter().enumerate() {
            for b in &keys[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
