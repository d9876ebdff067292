//! Branch protection domain types.
//!
//! GitHub reads branch protection as a nested object (`{"enabled": true}`
//! wrappers, review settings grouped under `required_pull_request_reviews`)
//! but the enforcer compares flat key/value maps. This module converts in
//! both directions.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "branch_protection_tests.rs"]
mod tests;

/// Keys that GitHub expects inside `required_pull_request_reviews`.
pub const REVIEW_SETTING_KEYS: [&str; 3] = [
    "dismiss_stale_reviews",
    "require_code_owner_reviews",
    "required_approving_review_count",
];

/// Top-level fields the update endpoint rejects the request without.
const REQUIRED_UPDATE_FIELDS: [&str; 3] =
    ["enforce_admins", "required_status_checks", "restrictions"];

const REVIEWS_FIELD: &str = "required_pull_request_reviews";

/// A protection flag as GitHub returns it, e.g. `{"url": "...", "enabled": true}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct EnabledSetting {
    pub enabled: bool,
}

/// Review requirements of a protected branch.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct PullRequestReviews {
    /// Whether stale reviews are dismissed when new commits are pushed
    pub dismiss_stale_reviews: Option<bool>,
    /// Whether code owner reviews are required
    pub require_code_owner_reviews: Option<bool>,
    /// Required number of approving reviews before merging
    pub required_approving_review_count: Option<u32>,
}

/// Branch protection rules as read from
/// `GET /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// # Examples
///
/// ```rust
/// use github_client::BranchProtection;
///
/// let protection: BranchProtection = serde_json::from_value(serde_json::json!({
///     "enforce_admins": { "enabled": true },
///     "required_pull_request_reviews": { "required_approving_review_count": 2 }
/// })).unwrap();
///
/// let flat = protection.to_settings();
/// assert_eq!(flat["enforce_admins"], true);
/// assert_eq!(flat["required_approving_review_count"], 2);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct BranchProtection {
    pub enforce_admins: Option<EnabledSetting>,
    pub required_pull_request_reviews: Option<PullRequestReviews>,
    pub allow_force_pushes: Option<EnabledSetting>,
    pub allow_deletions: Option<EnabledSetting>,
    pub required_linear_history: Option<EnabledSetting>,
    pub required_conversation_resolution: Option<EnabledSetting>,
}

impl BranchProtection {
    /// Flattens the protection rules into a key/value map.
    ///
    /// `{"enabled": x}` wrappers collapse to `x` and review requirements are
    /// lifted to the top level. Rules GitHub did not report are left out.
    pub fn to_settings(&self) -> Map<String, Value> {
        let mut settings = Map::new();

        let flags = [
            ("enforce_admins", &self.enforce_admins),
            ("allow_force_pushes", &self.allow_force_pushes),
            ("allow_deletions", &self.allow_deletions),
            ("required_linear_history", &self.required_linear_history),
            (
                "required_conversation_resolution",
                &self.required_conversation_resolution,
            ),
        ];
        for (key, flag) in flags {
            if let Some(flag) = flag {
                settings.insert(key.to_string(), Value::Bool(flag.enabled));
            }
        }

        if let Some(reviews) = &self.required_pull_request_reviews {
            if let Some(dismiss) = reviews.dismiss_stale_reviews {
                settings.insert("dismiss_stale_reviews".to_string(), Value::Bool(dismiss));
            }
            if let Some(code_owners) = reviews.require_code_owner_reviews {
                settings.insert(
                    "require_code_owner_reviews".to_string(),
                    Value::Bool(code_owners),
                );
            }
            if let Some(count) = reviews.required_approving_review_count {
                settings.insert(
                    "required_approving_review_count".to_string(),
                    Value::from(count),
                );
            }
        }

        settings
    }
}

/// Request body for `PUT /repos/{owner}/{repo}/branches/{branch}/protection`.
///
/// Built from a flat settings map: review keys are nested under
/// `required_pull_request_reviews` and the fields the endpoint requires are
/// filled with `null` when the map does not provide them.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct BranchProtectionUpdate {
    payload: Map<String, Value>,
}

impl BranchProtectionUpdate {
    pub fn from_settings(settings: &Map<String, Value>) -> Self {
        let mut payload = Map::new();
        let mut reviews = Map::new();

        for (key, value) in settings {
            if REVIEW_SETTING_KEYS.contains(&key.as_str()) {
                reviews.insert(key.clone(), value.clone());
            } else {
                payload.insert(key.clone(), value.clone());
            }
        }

        if reviews.is_empty() {
            payload
                .entry(REVIEWS_FIELD.to_string())
                .or_insert(Value::Null);
        } else {
            payload.insert(REVIEWS_FIELD.to_string(), Value::Object(reviews));
        }

        for field in REQUIRED_UPDATE_FIELDS {
            payload.entry(field.to_string()).or_insert(Value::Null);
        }

        Self { payload }
    }

    /// Returns the JSON body that will be sent.
    pub fn payload(&self) -> &Map<String, Value> {
        &self.payload
    }
}
