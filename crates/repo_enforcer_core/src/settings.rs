//! Settings maps and the mandated organization defaults.
//!
//! Repository settings and branch protection settings are both modelled as a
//! flat map from the GitHub REST API field name to a boolean, integer or
//! string value. The mandated maps are fixed for the lifetime of the process and
//! always win over user supplied overrides.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;

/// A single setting value.
///
/// Variant order matters for deserialization: booleans and integers are tried
/// before falling back to a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl SettingValue {
    /// Interprets a value typed on the command line.
    ///
    /// Boolean words are checked first so that `yes`/`no` style flags work,
    /// then decimal integers. Anything else is kept verbatim as a string.
    pub fn from_cli(value: &str) -> Self {
        let trimmed = value.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "true" | "t" | "yes" | "y" | "on" => return SettingValue::Bool(true),
            "false" | "f" | "no" | "n" | "off" => return SettingValue::Bool(false),
            _ => {}
        }
        match trimmed.parse::<i64>() {
            Ok(i) => SettingValue::Int(i),
            Err(_) => SettingValue::Str(value.to_string()),
        }
    }

    /// Converts a JSON value reported by GitHub.
    ///
    /// Returns `None` for objects, arrays, nulls and non-integer numbers.
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Bool(b) => Some(SettingValue::Bool(*b)),
            Value::Number(n) => n.as_i64().map(SettingValue::Int),
            Value::String(s) => Some(SettingValue::Str(s.clone())),
            _ => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            SettingValue::Bool(b) => Value::Bool(*b),
            SettingValue::Int(i) => Value::from(*i),
            SettingValue::Str(s) => Value::String(s.clone()),
        }
    }
}

impl From<bool> for SettingValue {
    fn from(value: bool) -> Self {
        SettingValue::Bool(value)
    }
}

impl From<i64> for SettingValue {
    fn from(value: i64) -> Self {
        SettingValue::Int(value)
    }
}

impl From<&str> for SettingValue {
    fn from(value: &str) -> Self {
        SettingValue::Str(value.to_string())
    }
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{}", b),
            SettingValue::Int(i) => write!(f, "{}", i),
            SettingValue::Str(s) => write!(f, "{}", s),
        }
    }
}

/// Setting name mapped to its value.
pub type Settings = BTreeMap<String, SettingValue>;

/// Repository settings applied to every repository that is not excluded.
pub static MANDATED_REPOSITORY_SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
    settings_from_pairs([
        ("allow_merge_commit", SettingValue::Bool(false)),
        ("allow_rebase_merge", SettingValue::Bool(false)),
        ("allow_squash_merge", SettingValue::Bool(true)),
        ("delete_branch_on_merge", SettingValue::Bool(true)),
    ])
});

/// Branch protection applied to the default branch and any requested branches.
pub static MANDATED_BRANCH_SETTINGS: LazyLock<Settings> = LazyLock::new(|| {
    settings_from_pairs([
        ("enforce_admins", SettingValue::Bool(true)),
        ("required_approving_review_count", SettingValue::Int(1)),
        ("allow_force_pushes", SettingValue::Bool(false)),
        ("required_conversation_resolution", SettingValue::Bool(true)),
    ])
});

fn settings_from_pairs<const N: usize>(pairs: [(&str, SettingValue); N]) -> Settings {
    pairs
        .into_iter()
        .map(|(key, value)| (key.to_string(), value))
        .collect()
}

/// Overlays the mandated settings on top of the user supplied ones.
///
/// Mandated keys always end up with their mandated value.
pub fn effective_settings(user: &Settings, mandated: &Settings) -> Settings {
    let mut effective = user.clone();
    for (key, value) in mandated {
        effective.insert(key.clone(), value.clone());
    }
    effective
}

/// Returns the keys of `desired` that are missing from `current` or differ.
pub fn changed_keys<'a>(current: &Settings, desired: &'a Settings) -> Vec<&'a str> {
    desired
        .iter()
        .filter(|(key, value)| current.get(*key) != Some(*value))
        .map(|(key, _)| key.as_str())
        .collect()
}

/// Returns `true` when applying `desired` would change `current`.
pub fn settings_changed(current: &Settings, desired: &Settings) -> bool {
    desired
        .iter()
        .any(|(key, value)| current.get(key) != Some(value))
}

/// Converts a JSON object from the GitHub client, dropping unsupported values.
pub fn settings_from_json(map: &Map<String, Value>) -> Settings {
    map.iter()
        .filter_map(|(key, value)| SettingValue::from_json(value).map(|v| (key.clone(), v)))
        .collect()
}

pub fn settings_to_json(settings: &Settings) -> Map<String, Value> {
    settings
        .iter()
        .map(|(key, value)| (key.clone(), value.to_json()))
        .collect()
}

/// Renders a settings map as `key=value` pairs for prompts and logs.
pub fn describe_settings(settings: &Settings) -> String {
    settings
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(", ")
}
