//! Quizzes, questions, and student attempts.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// Pass/fail outcome of a graded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassStatus {
    /// Percentage met the pass threshold.
    Pass,
    /// Percentage fell below the pass threshold.
    Fail,
}

/// A multiple-choice question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// Unique id within the quiz.
    pub id: RecordId,
    /// Question text.
    pub question: String,
    /// Answer options in display order.
    pub options: Vec<String>,
    /// Index into `options` of the correct answer.
    pub correct_option: usize,
}

impl Question {
    /// Creates a new question.
    pub fn new(question: impl Into<String>, options: Vec<String>, correct_option: usize) -> Self {
        Self {
            id: RecordId::new(),
            question: question.into(),
            options,
            correct_option,
        }
    }
}

/// One answer inside an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Answer {
    /// The question being answered.
    pub question_id: RecordId,
    /// Index of the option the student selected.
    pub selected_option: usize,
}

/// A graded attempt, stored on the quiz that was taken.
///
/// Student linkage is by `student_id`; `student_name` is a display copy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    /// Unique id of the attempt.
    pub id: RecordId,
    /// Foreign key to the user record.
    pub student_id: RecordId,
    /// Student display name (denormalized copy).
    pub student_name: String,
    /// When the attempt was recorded.
    pub date: Timestamp,
    /// Questions answered correctly.
    pub marks: u32,
    /// Total questions in the quiz at attempt time.
    pub total_marks: u32,
    /// Rounded percentage, 0-100.
    pub percentage: u8,
    /// Pass/fail against the quiz's threshold.
    pub status: PassStatus,
    /// The answers as submitted.
    pub answers: Vec<Answer>,
}

/// A quiz with its questions and recorded attempts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quiz {
    /// Unique record id.
    pub id: RecordId,
    /// Quiz title.
    pub title: String,
    /// Description shown before starting.
    pub description: String,
    /// Short join code students enter.
    pub quiz_code: String,
    /// Time limit in minutes.
    pub duration_minutes: u32,
    /// Points awarded on passing.
    pub points: u32,
    /// Difficulty label ("Beginner", "Advanced", ...).
    pub level: String,
    /// Per-quiz pass threshold in percent; falls back to the store
    /// default when `None`.
    pub pass_threshold_pct: Option<u8>,
    /// Questions in display order.
    pub questions: Vec<Question>,
    /// Recorded attempts in submission order.
    pub attempts: Vec<Attempt>,
    /// Activation state.
    pub status: Status,
}

impl Quiz {
    /// Creates a new active quiz with no questions or attempts.
    pub fn new(
        title: impl Into<String>,
        quiz_code: impl Into<String>,
        duration_minutes: u32,
        points: u32,
    ) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            description: String::new(),
            quiz_code: quiz_code.into(),
            duration_minutes,
            points,
            level: "Beginner".to_string(),
            pass_threshold_pct: None,
            questions: Vec::new(),
            attempts: Vec::new(),
            status: Status::Active,
        }
    }

    /// Finds a question by id.
    #[must_use]
    pub fn question(&self, question_id: RecordId) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == question_id)
    }
}

impl Entity for Quiz {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.title, "quiz title")?;
        require_non_empty(&self.quiz_code, "quiz code")
    }
}

impl HasStatus for Quiz {
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
    fn new_quiz_is_empty() {
        let quiz = Quiz::new("Rust Basics", "RST101", 30, 100);
        assert!(quiz.questions.is_empty());
        assert!(quiz.attempts.is_empty());
        assert_eq!(quiz.pass_threshold_pct, None);
    }

    #[test]
    fn question_lookup_by_id() {
        let mut quiz = Quiz::new("Rust Basics", "RST101", 30, 100);
        let q = Question::new("What is ownership?", vec!["a".into(), "b".into()], 0);
        let q_id = q.id;
        quiz.questions.push(q);

        assert!(quiz.question(q_id).is_some());
        assert!(quiz.question(RecordId::new()).is_none());
    }

    #[test]
    fn blank_code_fails_validation() {
        let quiz = Quiz::new("Rust Basics", "", 30, 100);
        assert!(quiz.validate().is_err());
    }
}
