//! Course category.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status};
use serde::{Deserialize, Serialize};

/// A catalog category.
///
/// Courses reference a category by display name; deleting a category does
/// not cascade to the courses that still carry its name (deliberate
/// orphaning, surfaced by `Store::integrity_report`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique record id.
    pub id: RecordId,
    /// Display name, also used as the join key from courses.
    pub name: String,
    /// Activation state.
    pub status: Status,
}

impl Category {
    /// Creates a new active category.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: RecordId::new(),
            name: name.into(),
            status: Status::Active,
        }
    }
}

impl Entity for Category {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.name, "category name")
    }
}

impl HasStatus for Category {
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
    fn new_category_is_active() {
        let category = Category::new("Development");
        assert_eq!(category.status, Status::Active);
        assert_eq!(category.name, "Development");
    }

    #[test]
    fn blank_name_fails_validation() {
        assert!(Category::new("   ").validate().is_err());
        assert!(Category::new("Design").validate().is_ok());
    }
}
