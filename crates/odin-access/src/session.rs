//! Parsing of the persisted user profile into access data.

use crate::{ModuleSet, Subscription, SubscriptionStatus, SubscriptionType};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// The `user_profile_<username>` document.
///
/// Fields this crate does not interpret are kept in `extra` so that writing
/// the profile back never drops data owned by other parts of the application.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    /// Role within the organization (e.g. `"admin"`, `"researcher"`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,

    /// Subscription block as stored
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subscription: Option<StoredSubscription>,

    /// Module ids the user chose to hide
    #[serde(default, deserialize_with = "null_as_empty")]
    pub hidden_tools: Vec<String>,

    /// Organization the user belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,

    /// Free-form permission strings
    #[serde(default, deserialize_with = "null_as_empty")]
    pub permissions: Vec<String>,

    /// Everything else in the document
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Account pages write `null` for lists that were never filled in.
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserProfile {
    /// Parse a stored profile document.
    ///
    /// # Errors
    /// Returns error if the document is not valid JSON of the expected shape.
    pub fn parse(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }

    /// Interpret the stored subscription block.
    #[must_use]
    pub fn subscription(&self) -> Subscription {
        self.subscription
            .as_ref()
            .map(StoredSubscription::interpret)
            .unwrap_or_default()
    }
}

/// Subscription block as written by the account pages.
///
/// The plan kind has been stored under both `planType` and `type`;
/// `planType` wins when both are present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubscription {
    /// Raw status string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    /// Raw plan name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plan_type: Option<String>,

    /// Legacy raw plan name
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub legacy_type: Option<String>,

    /// Modules covered by a per-module plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modules: Option<ModuleSet>,
}

impl StoredSubscription {
    fn interpret(&self) -> Subscription {
        let status = self
            .status
            .as_deref()
            .map_or(SubscriptionStatus::None, SubscriptionStatus::parse);
        let plan = self
            .plan_type
            .as_deref()
            .or(self.legacy_type.as_deref())
            .map_or(SubscriptionType::Free, SubscriptionType::parse);

        Subscription {
            status,
            plan,
            modules: self.modules.clone().unwrap_or_default(),
        }
    }
}

/// Everything the evaluator needs to decide visibility.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessData {
    /// Entitlement
    pub subscription: Subscription,
    /// Modules suppressed by the user, independent of entitlement
    pub hidden_tools: BTreeSet<String>,
    /// Role, informational only
    pub role: Option<String>,
    /// Organization, informational only
    pub organization_id: Option<String>,
    /// Free-form permissions, informational only
    pub permissions: Vec<String>,
}

impl AccessData {
    /// Convenience accessor for the subscription status.
    #[must_use]
    pub fn subscription_status(&self) -> SubscriptionStatus {
        self.subscription.status
    }

    /// Convenience accessor for the plan kind.
    #[must_use]
    pub fn subscription_type(&self) -> SubscriptionType {
        self.subscription.plan
    }
}

impl From<&UserProfile> for AccessData {
    fn from(profile: &UserProfile) -> Self {
        Self {
            subscription: profile.subscription(),
            hidden_tools: profile.hidden_tools.iter().cloned().collect(),
            role: profile.role.clone(),
            organization_id: profile.organization_id.clone(),
            permissions: profile.permissions.clone(),
        }
    }
}

/// Derive access data from a raw profile snapshot.
///
/// Absent or malformed input yields the least-privileged default (public
/// modules only); this function never fails.
#[must_use]
pub fn get_access_data(session_blob: Option<&str>) -> AccessData {
    let Some(raw) = session_blob else {
        debug!("no session profile, using anonymous access");
        return AccessData::default();
    };

    match UserProfile::parse(raw) {
        Ok(profile) => AccessData::from(&profile),
        Err(e) => {
            warn!(error = %e, "malformed session profile, using anonymous access");
            AccessData::default()
        }
    }
}
