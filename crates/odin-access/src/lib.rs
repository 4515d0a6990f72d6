//! Odin Access - Subscription and hidden-tool gating for catalog modules.
//!
//! Every navigable module carries a module identifier. This crate decides,
//! from the persisted user profile, whether the current user may see it:
//! - `"any"` modules are public and always visible
//! - otherwise the module must be entitled by an active subscription
//! - and must not be in the user's hidden tools
//!
//! Access is re-derived from storage on every check; nothing is cached, so a
//! plan change takes effect on the very next check.
//!
//! # Example
//!
//! ```rust
//! use odin_access::has_access;
//!
//! let profile = r#"{"subscription":{"status":"active","planType":"per_module","modules":["munin"]}}"#;
//! assert!(has_access("munin", Some(profile), None, None));
//! assert!(!has_access("hugin", Some(profile), None, None));
//! assert!(has_access("any", None, None, None));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

mod evaluator;
mod plans;
mod session;

pub use evaluator::{has_access, AccessEvaluator};
pub use session::{get_access_data, AccessData, UserProfile};

use odin_core::StorageError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

/// Errors that can occur while updating access state.
///
/// Access *checks* never fail; only writes to the profile can.
#[derive(Error, Debug)]
pub enum AccessError {
    /// No user is signed in, so there is no profile to update
    #[error("no active user session")]
    Anonymous,

    /// Storage read or write failed
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for access operations.
pub type Result<T> = std::result::Result<T, AccessError>;

/// Whether the user's subscription is currently in force.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatus {
    /// No subscription, or a lapsed one
    #[default]
    None,
    /// Subscription is active
    Active,
}

impl SubscriptionStatus {
    /// Parse a stored status. Anything but `"active"` counts as no subscription.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        if raw.eq_ignore_ascii_case("active") {
            Self::Active
        } else {
            Self::None
        }
    }
}

/// Kind of plan the user subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionType {
    /// Public pages only
    #[default]
    Free,
    /// Only the modules listed in the subscription
    PerModule,
    /// Every module
    Full,
}

impl SubscriptionType {
    /// Parse a stored plan name. Unknown names degrade to [`SubscriptionType::Free`].
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "full" => Self::Full,
            "per_module" | "per-module" | "permodule" => Self::PerModule,
            _ => Self::Free,
        }
    }
}

/// Modules covered by a per-module plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawModuleSet", into = "RawModuleSet")]
pub enum ModuleSet {
    /// Every module (stored as the string `"all"`)
    All,
    /// An explicit list of module ids
    Only(BTreeSet<String>),
}

impl ModuleSet {
    /// Check membership.
    #[must_use]
    pub fn contains(&self, module_id: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(modules) => modules.contains(module_id),
        }
    }
}

impl Default for ModuleSet {
    fn default() -> Self {
        Self::Only(BTreeSet::new())
    }
}

impl<S: Into<String>> FromIterator<S> for ModuleSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::Only(iter.into_iter().map(Into::into).collect())
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawModuleSet {
    Keyword(String),
    List(Vec<String>),
}

impl From<RawModuleSet> for ModuleSet {
    fn from(raw: RawModuleSet) -> Self {
        match raw {
            RawModuleSet::Keyword(word) if word == "all" => Self::All,
            RawModuleSet::Keyword(_) => Self::default(),
            RawModuleSet::List(modules) => Self::Only(modules.into_iter().collect()),
        }
    }
}

impl From<ModuleSet> for RawModuleSet {
    fn from(set: ModuleSet) -> Self {
        match set {
            ModuleSet::All => Self::Keyword("all".to_string()),
            ModuleSet::Only(modules) => Self::List(modules.into_iter().collect()),
        }
    }
}

/// The entitlement part of a user's access record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    /// Whether the subscription is in force
    pub status: SubscriptionStatus,
    /// Plan kind
    pub plan: SubscriptionType,
    /// Modules covered by a per-module plan
    pub modules: ModuleSet,
}

impl Subscription {
    /// An active subscription of the given kind.
    #[must_use]
    pub fn active(plan: SubscriptionType, modules: ModuleSet) -> Self {
        Self {
            status: SubscriptionStatus::Active,
            plan,
            modules,
        }
    }

    /// Whether this subscription entitles the given (non-public) module.
    #[must_use]
    pub fn entitles(&self, module_id: &str) -> bool {
        if self.status != SubscriptionStatus::Active {
            return false;
        }

        match self.plan {
            SubscriptionType::Full => true,
            SubscriptionType::PerModule => self.modules.contains(module_id),
            SubscriptionType::Free => false,
        }
    }
}
