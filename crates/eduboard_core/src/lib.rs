//! # Eduboard Core
//!
//! Client-resident data store for the Eduboard admin back-office.
//!
//! This crate provides:
//! - Typed entity collections (courses, users, quizzes, enrollments, ...)
//! - A [`Store`] façade that is the single mutation path
//! - Id-based referential joins through an incrementally maintained index
//! - Derived aggregates (revenue, student counts, quiz grading, wallets)
//! - Snapshot persistence over the pluggable `eduboard_storage` backends
//!
//! # Example
//!
//! ```rust
//! use eduboard_core::{AccessType, Config, Payment, Store};
//! use eduboard_storage::MemoryBackend;
//!
//! let store = Store::open(Box::new(MemoryBackend::new()), Config::default());
//!
//! let courses = store.list_courses();
//! let users = store.list_users();
//! store.enroll_course(users[0].id, courses[0].id, AccessType::Free, Payment::free())?;
//!
//! assert_eq!(store.course_student_count(courses[0].id)?, 1);
//! # Ok::<(), eduboard_core::StoreError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod aggregate;
mod collection;
mod config;
mod error;
mod index;
mod model;
mod seed;
mod store;
mod types;

pub use aggregate::{
    certificate_eligible, grade_attempt, reconcile_wallet, revenue, student_count, AttemptOutcome,
    WalletReconciliation,
};
pub use config::Config;
pub use error::{IntegrityWarning, StoreError, StoreResult};
pub use model::{
    AcademicInfo, AccessType, Answer, Attempt, Category, CertificateConfig, CertificateElement,
    CertificateElements, Comment, Course, Enrollment, EnrollmentKind, Entity, HasStatus,
    Instructor, Lesson, PassStatus, Payment, PaymentStatus, PriceType, Question, Quiz, Referral,
    ReferralData, Reply, Review, Section, Short, Slider, SocialLinks, StudentDetails,
    SubscriptionPlan, User, Wallet, WalletTransaction, WalletTxnKind,
};
pub use store::Store;
pub use types::{RecordId, Status, Timestamp};
