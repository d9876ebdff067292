//! Configuration file support for the repo-enforcer CLI.
//!
//! The configuration file is optional. It supplies defaults that the command
//! line can extend or override; the mandated organization settings are
//! applied on top of both and cannot be changed here.
//!
//! # Example TOML Configuration
//!
//! ```toml
//! slack_webhook = "https://hooks.slack.com/services/T000/B000/XXXX"
//! branches = ["develop"]
//!
//! [repository_settings]
//! allow_auto_merge = true
//!
//! [branch_settings]
//! dismiss_stale_reviews = true
//!
//! [exclusions]
//! prefixes = ["sandbox-"]
//! names = ["legacy-monolith"]
//! ```

use std::{fs, path::Path};

use repo_enforcer_core::{ExclusionRules, Settings};
use serde::Deserialize;
use tracing::debug;

use crate::errors::Error;

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;

/// Extra repositories to leave alone, on top of the built-in exclusions.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ExclusionConfig {
    #[serde(default)]
    pub prefixes: Vec<String>,

    #[serde(default)]
    pub names: Vec<String>,
}

/// Contents of the configuration file.
#[derive(Debug, Default, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Slack incoming-webhook URL used when none is given on the command line
    pub slack_webhook: Option<String>,

    /// Branches to protect in addition to each default branch
    #[serde(default)]
    pub branches: Vec<String>,

    /// Repository setting overrides
    #[serde(default)]
    pub repository_settings: Settings,

    /// Branch protection overrides
    #[serde(default)]
    pub branch_settings: Settings,

    #[serde(default)]
    pub exclusions: ExclusionConfig,
}

impl AppConfig {
    /// Loads configuration from a TOML file at the specified path.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the file does not exist, cannot be read or
    /// does not match the expected structure.
    pub fn load(path: &Path) -> Result<Self, Error> {
        debug!("Loading configuration from {:?}", path);

        if !path.exists() {
            return Err(Error::Config(format!(
                "Configuration file not found: {:?}",
                path
            )));
        }

        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read configuration file: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self, Error> {
        toml::from_str(content)
            .map_err(|e| Error::Config(format!("Failed to parse configuration file: {}", e)))
    }

    /// Built-in exclusions extended with the configured ones.
    pub fn exclusion_rules(&self) -> ExclusionRules {
        ExclusionRules::default().with_additional(
            self.exclusions.prefixes.iter().cloned(),
            self.exclusions.names.iter().cloned(),
        )
    }
}
