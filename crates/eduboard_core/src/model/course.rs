//! Course, curriculum sections, and lessons.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// Whether a course is free or paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceType {
    /// No charge; prices are ignored.
    Free,
    /// Sold at `current_price`.
    Paid,
}

/// A catalog course with its ordered curriculum.
///
/// The instructor is linked by `instructor_id`; `instructor` is the display
/// name copied at creation time and is never used for joins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    /// Unique record id.
    pub id: RecordId,
    /// Course title.
    pub title: String,
    /// Category display name.
    pub category: String,
    /// Foreign key to the instructor record.
    pub instructor_id: RecordId,
    /// Instructor display name (denormalized copy).
    pub instructor: String,
    /// Free or paid.
    pub price_type: PriceType,
    /// List price in cents.
    pub original_price: i64,
    /// Current (possibly discounted) price in cents.
    pub current_price: i64,
    /// Optional marketing badge ("Bestseller", "New", ...).
    pub badge: Option<String>,
    /// Human-readable total duration ("12h 30m").
    pub duration: String,
    /// Ordered curriculum sections.
    pub curriculum: Vec<Section>,
    /// Activation state.
    pub status: Status,
    /// Creation time.
    pub created_at: Timestamp,
}

impl Course {
    /// Creates a new active course with an empty curriculum.
    pub fn new(
        title: impl Into<String>,
        category: impl Into<String>,
        instructor_id: RecordId,
        instructor: impl Into<String>,
        price_type: PriceType,
        original_price: i64,
        current_price: i64,
    ) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            category: category.into(),
            instructor_id,
            instructor: instructor.into(),
            price_type,
            original_price,
            current_price,
            badge: None,
            duration: String::new(),
            curriculum: Vec::new(),
            status: Status::Active,
            created_at: Timestamp::now(),
        }
    }

    /// Finds a section by id.
    #[must_use]
    pub fn section(&self, section_id: RecordId) -> Option<&Section> {
        self.curriculum.iter().find(|s| s.id == section_id)
    }

    /// Returns the total number of lessons across all sections.
    #[must_use]
    pub fn lesson_count(&self) -> usize {
        self.curriculum.iter().map(|s| s.lessons.len()).sum()
    }
}

impl Entity for Course {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.title, "course title")?;
        require_non_empty(&self.category, "course category")
    }
}

impl HasStatus for Course {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// An ordered group of lessons within a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    /// Unique id within the course.
    pub id: RecordId,
    /// Section title.
    pub title: String,
    /// Ordered lessons.
    pub lessons: Vec<Lesson>,
}

impl Section {
    /// Creates a new empty section.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            lessons: Vec::new(),
        }
    }
}

/// A single lesson.
///
/// A lesson belongs to exactly one section of exactly one course at any
/// time; moving it is a remove-then-insert, never a duplicate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    /// Unique id within the course.
    pub id: RecordId,
    /// Lesson title.
    pub title: String,
    /// Display serial number.
    pub sr_no: u32,
    /// Human-readable duration ("08:30").
    pub duration: String,
    /// Reference to the lesson video asset.
    pub video_ref: Option<String>,
    /// Reference to the thumbnail asset.
    pub thumbnail_ref: Option<String>,
    /// Reference to an attached PDF asset.
    pub pdf_ref: Option<String>,
    /// Whether the lesson requires enrollment to view.
    pub is_locked: bool,
    /// Activation state.
    pub status: Status,
}

impl Lesson {
    /// Creates a new unlocked, active lesson.
    pub fn new(title: impl Into<String>, sr_no: u32, duration: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            sr_no,
            duration: duration.into(),
            video_ref: None,
            thumbnail_ref: None,
            pdf_ref: None,
            is_locked: false,
            status: Status::Active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_course() -> Course {
        Course::new(
            "Rust in Practice",
            "Development",
            RecordId::new(),
            "Ada Deva",
            PriceType::Paid,
            14999,
            9999,
        )
    }

    #[test]
    fn new_course_has_empty_curriculum() {
        let course = sample_course();
        assert!(course.curriculum.is_empty());
        assert_eq!(course.lesson_count(), 0);
    }

    #[test]
    fn lesson_count_spans_sections() {
        let mut course = sample_course();
        let mut intro = Section::new("Introduction");
        intro.lessons.push(Lesson::new("Welcome", 1, "02:00"));
        intro.lessons.push(Lesson::new("Setup", 2, "10:00"));
        let mut basics = Section::new("Basics");
        basics.lessons.push(Lesson::new("Ownership", 1, "15:00"));
        course.curriculum.push(intro);
        course.curriculum.push(basics);

        assert_eq!(course.lesson_count(), 3);
    }

    #[test]
    fn blank_title_fails_validation() {
        let mut course = sample_course();
        course.title = " ".to_string();
        assert!(course.validate().is_err());
    }
}
