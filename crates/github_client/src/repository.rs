//! Repository domain types.
//!
//! This module contains types representing GitHub repositories and organizations,
//! reduced to the fields that matter for settings enforcement.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "repository_tests.rs"]
mod tests;

/// Represents a GitHub organization.
///
/// # Examples
///
/// ```rust
/// use github_client::Organization;
///
/// let org = Organization {
///     name: "my-organization".to_string(),
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Organization {
    /// The login name of the organization
    pub name: String,
}

/// Represents a GitHub repository and the settings GitHub reported for it.
///
/// Every top-level boolean, number and string of the REST record is kept as a
/// setting under its API field name. The organization listing endpoint leaves
/// out the merge settings, so repositories taken from a listing carry fewer
/// settings than ones fetched individually.
///
/// # Examples
///
/// ```rust
/// use github_client::Repository;
///
/// let repo = Repository::new("my-repo".to_string(), "owner/my-repo".to_string())
///     .with_default_branch("main")
///     .with_setting("allow_squash_merge", true);
///
/// assert_eq!(repo.name(), "my-repo");
/// assert_eq!(repo.default_branch(), Some("main"));
/// assert!(!repo.is_archived());
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Repository {
    /// The full name of the repository (owner/name)
    full_name: String,
    /// The name of the repository
    name: String,
    /// Whether the repository is archived (read-only)
    archived: bool,
    /// The default branch, `None` for an empty repository
    default_branch: Option<String>,
    /// Scalar fields of the REST record keyed by API field name
    settings: Map<String, Value>,
}

impl Repository {
    /// Creates a new Repository instance with no settings populated.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the repository
    /// * `full_name` - The full name including owner (owner/repo)
    pub fn new(name: String, full_name: String) -> Self {
        Self {
            full_name,
            name,
            archived: false,
            default_branch: None,
            settings: Map::new(),
        }
    }

    pub fn with_archived(mut self, archived: bool) -> Self {
        self.archived = archived;
        self.settings
            .insert("archived".to_string(), Value::Bool(archived));
        self
    }

    pub fn with_default_branch(mut self, branch: impl Into<String>) -> Self {
        let branch = branch.into();
        self.settings
            .insert("default_branch".to_string(), Value::String(branch.clone()));
        self.default_branch = Some(branch);
        self
    }

    /// Records a setting as if GitHub had reported it.
    pub fn with_setting(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.settings.insert(key.into(), value.into());
        self
    }

    /// Returns the name of the repository (without owner).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full name of the repository (owner/name).
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns whether the repository is archived.
    pub fn is_archived(&self) -> bool {
        self.archived
    }

    /// Returns the default branch, if the repository has one.
    pub fn default_branch(&self) -> Option<&str> {
        self.default_branch.as_deref()
    }

    /// Returns the settings GitHub reported as a JSON object.
    ///
    /// Keys use the REST API field names. Settings GitHub did not report are
    /// left out rather than defaulted; nested objects, arrays and nulls are
    /// never included.
    pub fn settings(&self) -> &Map<String, Value> {
        &self.settings
    }
}

impl TryFrom<Map<String, Value>> for Repository {
    type Error = String;

    fn try_from(record: Map<String, Value>) -> Result<Self, Self::Error> {
        let name = record
            .get("name")
            .and_then(Value::as_str)
            .ok_or_else(|| "repository record has no `name`".to_string())?
            .to_string();
        let full_name = record
            .get("full_name")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| name.clone());
        let archived = record
            .get("archived")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        let default_branch = record
            .get("default_branch")
            .and_then(Value::as_str)
            .map(str::to_string);

        let settings = record
            .into_iter()
            .filter(|(_, value)| matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_)))
            .collect();

        Ok(Self {
            full_name,
            name,
            archived,
            default_branch,
            settings,
        })
    }
}
