//! Module visibility checks.

use crate::{
    session::{get_access_data, UserProfile},
    AccessData, AccessError, Result, Subscription,
};
use odin_core::{keys, KeyValueStore, ModuleId};
use std::collections::BTreeSet;
use tracing::{debug, info, trace, warn};

/// Decide whether a module is visible.
///
/// Pure function of its inputs: `"any"` is always visible; otherwise the
/// module must not be hidden and must be entitled. The overrides replace the
/// corresponding parts of the stored session when given.
#[must_use]
pub fn has_access(
    module_id: &str,
    session_blob: Option<&str>,
    subscription_override: Option<&Subscription>,
    hidden_tools_override: Option<&BTreeSet<String>>,
) -> bool {
    if module_id == ModuleId::ANY {
        return true;
    }

    let data = get_access_data(session_blob);
    let subscription = subscription_override.unwrap_or(&data.subscription);
    let hidden_tools = hidden_tools_override.unwrap_or(&data.hidden_tools);

    let allowed = !hidden_tools.contains(module_id) && subscription.entitles(module_id);
    trace!(module_id, allowed, "access check");
    allowed
}

/// Store-backed access evaluator.
///
/// Reads `currentUser` and `user_profile_<username>` on every call, so the
/// answer always reflects the latest persisted profile.
#[derive(Debug, Clone)]
pub struct AccessEvaluator<S> {
    store: S,
}

impl<S: KeyValueStore> AccessEvaluator<S> {
    /// Create an evaluator over the given store.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Username of the active session, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<String> {
        match self.store.get(keys::CURRENT_USER) {
            Ok(user) => user.filter(|u| !u.is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read current user");
                None
            }
        }
    }

    fn session_blob(&self) -> Option<String> {
        let username = self.current_user()?;
        match self.store.get(&keys::user_profile(&username)) {
            Ok(blob) => blob,
            Err(e) => {
                warn!(username = %username, error = %e, "failed to read user profile");
                None
            }
        }
    }

    /// Access data of the current session.
    #[must_use]
    pub fn access_data(&self) -> AccessData {
        get_access_data(self.session_blob().as_deref())
    }

    /// Whether the current user may see the module.
    #[must_use]
    pub fn has_access(&self, module_id: &str) -> bool {
        has_access(module_id, self.session_blob().as_deref(), None, None)
    }

    /// Hide a module from the current user's menus.
    pub fn hide_tool(&self, module_id: &str) -> Result<()> {
        self.update_profile(|profile| {
            if !profile.hidden_tools.iter().any(|t| t == module_id) {
                profile.hidden_tools.push(module_id.to_string());
            }
        })?;
        info!(module_id, "tool hidden");
        Ok(())
    }

    /// Show a previously hidden module again.
    pub fn show_tool(&self, module_id: &str) -> Result<()> {
        self.update_profile(|profile| profile.hidden_tools.retain(|t| t != module_id))?;
        info!(module_id, "tool shown");
        Ok(())
    }

    /// Replace the whole hidden-tools list.
    pub fn set_hidden_tools(&self, module_ids: &[String]) -> Result<()> {
        self.update_profile(|profile| {
            let mut seen = BTreeSet::new();
            profile.hidden_tools = module_ids
                .iter()
                .filter(|id| seen.insert(id.as_str()))
                .cloned()
                .collect();
        })?;
        debug!(count = module_ids.len(), "hidden tools replaced");
        Ok(())
    }

    fn update_profile(&self, update: impl FnOnce(&mut UserProfile)) -> Result<()> {
        let username = self.current_user().ok_or(AccessError::Anonymous)?;
        let key = keys::user_profile(&username);

        let mut profile = match self.store.get(&key)? {
            Some(raw) => UserProfile::parse(&raw).map_err(|e| {
                warn!(username = %username, error = %e, "refusing to rewrite malformed user profile");
                AccessError::Serialization(e)
            })?,
            None => UserProfile::default(),
        };

        update(&mut profile);

        let raw = serde_json::to_string(&profile)?;
        self.store.set(&key, &raw)?;
        Ok(())
    }
}
