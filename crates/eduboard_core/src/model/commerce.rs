//! Subscription plans and referral sign-ups.

use super::{require_non_empty, Entity, HasStatus};
use crate::error::StoreResult;
use crate::types::{RecordId, Status};
use serde::{Deserialize, Serialize};

/// A subscription plan offered on the platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionPlan {
    /// Unique record id.
    pub id: RecordId,
    /// Plan label ("Basic", "Pro", "Campus", ...).
    pub plan_type: String,
    /// Billing period length in months.
    pub duration_months: u32,
    /// Price per period, in cents.
    pub price: i64,
    /// Benefit bullet points.
    pub benefits: Vec<String>,
    /// Activation state.
    pub status: Status,
}

impl SubscriptionPlan {
    /// Creates a new active plan.
    pub fn new(plan_type: impl Into<String>, duration_months: u32, price: i64) -> Self {
        Self {
            id: RecordId::new(),
            plan_type: plan_type.into(),
            duration_months,
            price,
            benefits: Vec::new(),
            status: Status::Active,
        }
    }
}

impl Entity for SubscriptionPlan {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.plan_type, "plan type")?;
        if self.price < 0 {
            return Err(crate::error::StoreError::validation(
                "plan price must not be negative",
            ));
        }
        Ok(())
    }
}

impl HasStatus for SubscriptionPlan {
    fn status(&self) -> Status {
        self.status
    }

    fn set_status(&mut self, status: Status) {
        self.status = status;
    }
}

/// A referral sign-up captured from the marketing site.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Referral {
    /// Unique record id.
    pub id: RecordId,
    /// Referred person's full name.
    pub full_name: String,
    /// Contact email.
    pub email: String,
    /// Contact phone number.
    pub phone: String,
    /// College name entered on the form.
    pub college: String,
    /// Course of interest.
    pub course: String,
    /// The referral code that was used.
    pub referral_code: String,
}

impl Referral {
    /// Creates a new referral record.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        referral_code: impl Into<String>,
    ) -> Self {
        Self {
            id: RecordId::new(),
            full_name: full_name.into(),
            email: email.into(),
            phone: String::new(),
            college: String::new(),
            course: String::new(),
            referral_code: referral_code.into(),
        }
    }
}

impl Entity for Referral {
    fn id(&self) -> RecordId {
        self.id
    }

    fn validate(&self) -> StoreResult<()> {
        require_non_empty(&self.full_name, "referral full name")?;
        require_non_empty(&self.referral_code, "referral code")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_rejects_negative_price() {
        let mut plan = SubscriptionPlan::new("Pro", 12, 49900);
        assert!(plan.validate().is_ok());
        plan.price = -1;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn referral_requires_code() {
        let referral = Referral::new("Dev Patel", "dev@example.com", "");
        assert!(referral.validate().is_err());
    }
}
