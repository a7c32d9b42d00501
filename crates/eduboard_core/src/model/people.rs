//! Users and instructors, including wallet and referral sub-records.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// An instructor account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instructor {
    /// Unique record id.
    pub id: RecordId,
    /// Display name; copied onto courses at creation time.
    pub name: String,
    /// Contact email. Uniqueness is not enforced by the store.
    pub email: String,
    /// Hashed credential; the store never sees plaintext passwords.
    pub password_hash: String,
    /// Role label ("Instructor", "Senior Instructor", ...).
    pub role: String,
    /// Activation state.
    pub status: Status,
    /// Creation time.
    pub created_at: Timestamp,
}

impl Instructor {
    /// Creates a new active instructor.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            email: email.into(),
            password_hash: password_hash.into(),
            role: "Instructor".to_string(),
            status: Status::Active,
            created_at: Timestamp::now(),
        }
    }
}

impl Entity for Instructor {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.name, "instructor name")?;
        require_non_empty(&self.email, "instructor email")
    }
}

impl HasStatus for Instructor {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// Academic background entered on a student profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct AcademicInfo {
    /// Institution name.
    pub institution: String,
    /// Qualification or degree.
    pub qualification: String,
}

/// Social profile links.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct SocialLinks {
    /// Personal website URL.
    pub website: Option<String>,
    /// LinkedIn profile URL.
    pub linkedin: Option<String>,
    /// Twitter/X profile URL.
    pub twitter: Option<String>,
    /// YouTube channel URL.
    pub youtube: Option<String>,
}

/// Learning progress counters shown on the student dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct StudentDetails {
    /// Number of completed courses.
    pub completed_courses: u32,
    /// Number of in-progress courses.
    pub ongoing_courses: u32,
    /// Total learning hours.
    pub learning_hours: u32,
    /// Overall progress, 0-100.
    pub progress_pct: u8,
    /// When the student profile was created.
    pub created_at: Timestamp,
}

/// Kind of wallet transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WalletTxnKind {
    /// Money added to the wallet (referral bonus, refund, ...).
    Credit,
    /// Money taken out of the wallet.
    Withdrawal,
}

/// One entry in a wallet's transaction log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalletTransaction {
    /// Unique id of the log entry.
    pub id: RecordId,
    /// Credit or withdrawal.
    pub kind: WalletTxnKind,
    /// Amount in cents, always positive.
    pub amount: i64,
    /// Free-form note ("Referral bonus", ...).
    pub note: String,
    /// When the transaction happened.
    pub at: Timestamp,
}

/// A user's wallet.
///
/// `earnings - withdrawn` is the authoritative balance. The `balance`
/// field is retained in the persisted document shape and rewritten on
/// every wallet mutation; a disagreement on read is reported as a
/// [`crate::IntegrityWarning::WalletDrift`], never an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct Wallet {
    /// Stored balance in cents (reconciled against the computed value).
    pub balance: i64,
    /// Lifetime credits in cents.
    pub earnings: i64,
    /// Lifetime withdrawals in cents.
    pub withdrawn: i64,
    /// Ordered transaction log.
    pub transactions: Vec<WalletTransaction>,
}

impl Wallet {
    /// Returns the authoritative balance, `earnings - withdrawn`.
    #[must_use]
    pub fn computed_balance(&self) -> i64 {
        self.earnings - self.withdrawn
    }
}

/// Referral bookkeeping on a user profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ReferralData {
    /// The code this user shares with others.
    pub my_referral_code: String,
    /// How many sign-ups used this user's code.
    pub referral_count: u32,
    /// Whether this user signed up through someone else's code.
    pub is_referred: bool,
    /// The code this user signed up with, if any.
    pub referred_by_code: Option<String>,
}

/// A platform user (student).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique record id.
    pub id: RecordId,
    /// Display name; copied onto enrollments at purchase time.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// Profile photo asset reference.
    pub photo: Option<String>,
    /// Role label ("Student").
    pub role: String,
    /// Activation state.
    pub status: Status,
    /// Academic background.
    pub academic: AcademicInfo,
    /// Self-reported skills.
    pub skills: Vec<String>,
    /// Social profile links.
    pub social: SocialLinks,
    /// Learning progress counters.
    pub student_details: StudentDetails,
    /// Wallet with transaction log.
    pub wallet: Wallet,
    /// Referral bookkeeping.
    pub referral: ReferralData,
    /// Names of purchased items.
    pub purchases: Vec<String>,
    /// Achievement labels.
    pub achievements: Vec<String>,
    /// Creation time.
    pub created_at: Timestamp,
}

impl User {
    /// Creates a new active user with empty wallet and referral data.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: RecordId::new(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            photo: None,
            role: "Student".to_string(),
            status: Status::Active,
            academic: AcademicInfo::default(),
            skills: Vec::new(),
            social: SocialLinks::default(),
            student_details: StudentDetails {
                created_at: now,
                ..StudentDetails::default()
            },
            wallet: Wallet::default(),
            referral: ReferralData::default(),
            purchases: Vec::new(),
            achievements: Vec::new(),
            created_at: now,
        }
    }
}

impl Entity for User {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.name, "user name")?;
        require_non_empty(&self.email, "user email")
    }
}

impl HasStatus for User {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_user_has_empty_wallet() {
        let user = User::new("Priya", "priya@example.com", "555-0100");
        assert_eq!(user.wallet.balance, 0);
        assert_eq!(user.wallet.computed_balance(), 0);
        assert!(user.wallet.transactions.is_empty());
    }

    #[test]
    fn computed_balance_is_earnings_minus_withdrawn() {
        let wallet = Wallet {
            balance: 0, // intentionally stale
            earnings: 5000,
            withdrawn: 1200,
            transactions: Vec::new(),
        };
        assert_eq!(wallet.computed_balance(), 3800);
    }

    #[test]
    fn blank_email_fails_validation() {
        let mut user = User::new("Priya", "priya@example.com", "555-0100");
        user.email = String::new();
        assert!(user.validate().is_err());
    }
}
