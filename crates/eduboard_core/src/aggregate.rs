//! Derived metrics, computed on demand from current collection state.
//!
//! Nothing in this module is cached or stored: every caller gets a fresh
//! computation over the records it passes in. Empty inputs yield zero
//! aggregates, never an error.

use crate::model::{Answer, Enrollment, PassStatus, Question, Wallet};
use serde::{Deserialize, Serialize};

/// Number of students enrolled, i.e. one per enrollment record.
#[must_use]
pub fn student_count(enrollments: &[Enrollment]) -> usize {
    enrollments.len()
}

/// Total revenue in cents across the given enrollments.
#[must_use]
pub fn revenue(enrollments: &[Enrollment]) -> i64 {
    enrollments.iter().map(|e| e.price).sum()
}

/// Whether an enrollment is eligible for a certificate.
#[must_use]
pub fn certificate_eligible(enrollment: &Enrollment) -> bool {
    enrollment.access == crate::model::AccessType::Completed
}

/// The graded result of a quiz attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptOutcome {
    /// Questions answered correctly.
    pub marks: u32,
    /// Total questions graded against.
    pub total_marks: u32,
    /// Rounded percentage, 0-100. Defined as 0 when there are no
    /// questions (never NaN).
    pub percentage: u8,
    /// Pass/fail against the supplied threshold.
    pub status: PassStatus,
}

/// Grades a set of answers against a quiz's questions.
///
/// Each question is matched to its answer by question id; a missing or
/// mismatched answer scores zero for that question. `percentage` is
/// rounded to the nearest integer and compared against
/// `pass_threshold_pct`.
#[must_use]
pub fn grade_attempt(
    questions: &[Question],
    answers: &[Answer],
    pass_threshold_pct: u8,
) -> AttemptOutcome {
    let marks = questions
        .iter()
        .filter(|q| {
            answers
                .iter()
                .find(|a| a.question_id == q.id)
                .is_some_and(|a| a.selected_option == q.correct_option)
        })
        .count() as u32;
    let total_marks = questions.len() as u32;

    // Guard the division: an empty quiz grades to 0%, not NaN
    let percentage = if total_marks == 0 {
        0
    } else {
        ((f64::from(marks) * 100.0) / f64::from(total_marks)).round() as u8
    };

    let status = if percentage >= pass_threshold_pct {
        PassStatus::Pass
    } else {
        PassStatus::Fail
    };

    AttemptOutcome {
        marks,
        total_marks,
        percentage,
        status,
    }
}

/// Result of reconciling a wallet's stored balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletReconciliation {
    /// The authoritative balance, `earnings - withdrawn`.
    pub computed: i64,
    /// The balance as stored on the record.
    pub stored: i64,
}

impl WalletReconciliation {
    /// Whether the stored field disagrees with the computed value.
    #[must_use]
    pub fn drifted(&self) -> bool {
        self.computed != self.stored
    }
}

/// Reconciles a wallet's stored balance against its derivable value.
///
/// Disagreement is a data-integrity finding for the caller to report; the
/// computed value is always the one to trust.
#[must_use]
pub fn reconcile_wallet(wallet: &Wallet) -> WalletReconciliation {
    WalletReconciliation {
        computed: wallet.computed_balance(),
        stored: wallet.balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AccessType, EnrollmentKind, Payment};
    use crate::types::RecordId;

    fn enrollment_with_price(price: i64) -> Enrollment {
        let mut e = Enrollment::new(
            EnrollmentKind::Course,
            RecordId::new(),
            "Student",
            Some(RecordId::new()),
            "Course",
            AccessType::Paid,
            Payment::free(),
        );
        e.price = price;
        e
    }

    #[test]
    fn revenue_sums_prices() {
        let enrollments = vec![enrollment_with_price(100), enrollment_with_price(250)];
        assert_eq!(revenue(&enrollments), 350);
        assert_eq!(student_count(&enrollments), 2);
    }

    #[test]
    fn empty_enrollments_yield_zero() {
        assert_eq!(revenue(&[]), 0);
        assert_eq!(student_count(&[]), 0);
    }

    #[test]
    fn grading_counts_correct_answers() {
        let q1 = Question::new("q1", vec!["a".into(), "b".into()], 1);
        let q2 = Question::new("q2", vec!["a".into(), "b".into()], 0);
        let answers = vec![
            Answer {
                question_id: q1.id,
                selected_option: 1,
            },
            Answer {
                question_id: q2.id,
                selected_option: 1,
            },
        ];

        let outcome = grade_attempt(&[q1, q2], &answers, 40);
        assert_eq!(outcome.marks, 1);
        assert_eq!(outcome.total_marks, 2);
        assert_eq!(outcome.percentage, 50);
        assert_eq!(outcome.status, PassStatus::Pass);
    }

    #[test]
    fn unanswered_questions_score_zero() {
        let q1 = Question::new("q1", vec!["a".into(), "b".into()], 0);
        let q2 = Question::new("q2", vec!["a".into(), "b".into()], 0);
        let answers = vec![Answer {
            question_id: q1.id,
            selected_option: 0,
        }];

        let outcome = grade_attempt(&[q1, q2], &answers, 60);
        assert_eq!(outcome.marks, 1);
        assert_eq!(outcome.percentage, 50);
        assert_eq!(outcome.status, PassStatus::Fail);
    }

    #[test]
    fn empty_quiz_grades_to_zero_percent() {
        let outcome = grade_attempt(&[], &[], 40);
        assert_eq!(outcome.marks, 0);
        assert_eq!(outcome.total_marks, 0);
        assert_eq!(outcome.percentage, 0);
        assert_eq!(outcome.status, PassStatus::Fail);
    }

    #[test]
    fn threshold_boundary_is_a_pass() {
        let q = Question::new("q", vec!["a".into(), "b".into()], 0);
        let answers = vec![Answer {
            question_id: q.id,
            selected_option: 0,
        }];
        let outcome = grade_attempt(&[q], &answers, 100);
        assert_eq!(outcome.status, PassStatus::Pass);
    }

    #[test]
    fn wallet_reconciliation_detects_drift() {
        let healthy = Wallet {
            balance: 3800,
            earnings: 5000,
            withdrawn: 1200,
            transactions: Vec::new(),
        };
        assert!(!reconcile_wallet(&healthy).drifted());

        let drifted = Wallet {
            balance: 9999,
            ..healthy
        };
        let reconciliation = reconcile_wallet(&drifted);
        assert!(reconciliation.drifted());
        assert_eq!(reconciliation.computed, 3800);
        assert_eq!(reconciliation.stored, 9999);
    }

    #[test]
    fn completed_enrollments_are_certificate_eligible() {
        let mut e = enrollment_with_price(0);
        assert!(!certificate_eligible(&e));
        e.access = AccessType::Completed;
        assert!(certificate_eligible(&e));
    }
}
