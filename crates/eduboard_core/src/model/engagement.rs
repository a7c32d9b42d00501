//! Engagement content: short-form videos with comments, marketing
//! sliders, and reviews.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status, Timestamp};
use serde::{Deserialize, Serialize};

/// A reply nested under a comment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reply {
    /// Display name of the replying user.
    pub user: String,
    /// Reply text.
    pub text: String,
    /// When the reply was posted.
    pub at: Timestamp,
}

/// A comment on a short, with nested replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Unique id within the short.
    pub id: RecordId,
    /// Display name of the commenting user.
    pub user: String,
    /// Comment text.
    pub text: String,
    /// When the comment was posted.
    pub at: Timestamp,
    /// Replies in posting order.
    pub replies: Vec<Reply>,
}

impl Comment {
    /// Creates a new comment with no replies.
    pub fn new(user: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            user: user.into(),
            text: text.into(),
            at: Timestamp::now(),
            replies: Vec::new(),
        }
    }
}

/// A short-form video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Short {
    /// Unique record id.
    pub id: RecordId,
    /// Reference to the video asset.
    pub video_ref: String,
    /// Instructor display name.
    pub instructor: String,
    /// Caption text.
    pub description: String,
    /// Activation state.
    pub status: Status,
    /// Like counter.
    pub likes: u64,
    /// Share counter.
    pub shares: u64,
    /// Comments in posting order.
    pub comments: Vec<Comment>,
}

impl Short {
    /// Creates a new active short with zeroed counters.
    pub fn new(video_ref: impl Into<String>, instructor: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            video_ref: video_ref.into(),
            instructor: instructor.into(),
            description: String::new(),
            status: Status::Active,
            likes: 0,
            shares: 0,
            comments: Vec::new(),
        }
    }
}

impl Entity for Short {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.video_ref, "short video reference")
    }
}

impl HasStatus for Short {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// A homepage marketing slider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    /// Unique record id.
    pub id: RecordId,
    /// Slide title.
    pub title: String,
    /// Reference to the slide image asset.
    pub image_ref: String,
    /// Optional click-through link.
    pub link: Option<String>,
    /// Activation state.
    pub status: Status,
}

impl Slider {
    /// Creates a new active slider.
    pub fn new(title: impl Into<String>, image_ref: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            title: title.into(),
            image_ref: image_ref.into(),
            link: None,
            status: Status::Active,
        }
    }
}

impl Entity for Slider {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.title, "slider title")
    }
}

impl HasStatus for Slider {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// A testimonial shown on the marketing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    /// Unique record id.
    pub id: RecordId,
    /// Reviewer display name.
    pub name: String,
    /// Reviewer photo asset reference.
    pub photo_ref: Option<String>,
    /// Star rating, 1-5.
    pub rating: u8,
    /// Review text.
    pub text: String,
    /// Activation state.
    pub status: Status,
}

impl Review {
    /// Creates a new active review.
    pub fn new(name: impl Into<String>, rating: u8, text: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            photo_ref: None,
            rating: rating.clamp(1, 5),
            text: text.into(),
            status: Status::Active,
        }
    }
}

impl Entity for Review {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.name, "review name")
    }
}

impl HasStatus for Review {
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
    fn new_short_has_zero_counters() {
        let short = Short::new("shorts/intro.mp4", "Ada Deva");
        assert_eq!(short.likes, 0);
        assert_eq!(short.shares, 0);
        assert!(short.comments.is_empty());
    }

    #[test]
    fn review_rating_is_clamped() {
        assert_eq!(Review::new("Sam", 9, "Great!").rating, 5);
        assert_eq!(Review::new("Sam", 0, "Meh").rating, 1);
    }

    #[test]
    fn comment_starts_without_replies() {
        let comment = Comment::new("priya", "Loved this one");
        assert!(comment.replies.is_empty());
    }
}
