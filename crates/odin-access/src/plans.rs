//! Human-facing descriptions of subscription plans.

use crate::SubscriptionType;

impl SubscriptionType {
    /// Get the display name for this plan.
    #[must_use]
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Free => "Free",
            Self::PerModule => "Per Module",
            Self::Full => "Full Access",
        }
    }

    /// Get a description of this plan.
    #[must_use]
    pub fn description(&self) -> &'static str {
        match self {
            Self::Free => "Public pages only. Upgrade to unlock laboratory modules.",
            Self::PerModule => "Pick the modules your lab needs and pay only for those.",
            Self::Full => "Every module, including all advanced laboratory tools.",
        }
    }

    /// Get all available plans, cheapest first.
    #[must_use]
    pub fn all() -> Vec<Self> {
        vec![Self::Free, Self::PerModule, Self::Full]
    }
}
