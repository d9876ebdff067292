//! Command line arguments.

use std::path::PathBuf;

use clap::Parser;
use repo_enforcer_core::{SettingValue, Settings};

#[cfg(test)]
#[path = "args_tests.rs"]
mod tests;

/// repo-enforcer: enforce repository and branch protection settings across a GitHub organization
#[derive(Parser, Debug)]
#[command(name = "repo-enforcer", version)]
#[command(
    about = "Enforce repository and branch protection settings across a GitHub organization",
    long_about = None
)]
pub struct Cli {
    /// The GitHub organization to enforce settings on
    pub organization: String,

    /// Only enforce settings on this repository
    #[arg(short = 'r', long = "repo-name")]
    pub repo_name: Option<String>,

    /// Branches to protect in addition to each repository's default branch
    #[arg(short = 'b', long = "branches", num_args = 1..)]
    pub branches: Vec<String>,

    /// GitHub access token
    #[arg(short = 't', long = "token", env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Repository setting overrides, e.g. default_branch=main; mandated settings always take precedence
    #[arg(long = "repo-settings", value_name = "KEY=VALUE", num_args = 1.., value_parser = parse_setting)]
    pub repo_settings: Vec<(String, SettingValue)>,

    /// Branch protection overrides, e.g. dismiss_stale_reviews=true; mandated settings always take precedence
    #[arg(long = "branch-settings", value_name = "KEY=VALUE", num_args = 1.., value_parser = parse_setting)]
    pub branch_settings: Vec<(String, SettingValue)>,

    /// Slack incoming-webhook URL to notify about changes
    #[arg(short = 's', long = "slack-webhook", env = "SLACK_WEBHOOK_URL", hide_env_values = true)]
    pub slack_webhook: Option<String>,

    /// Apply changes without asking for confirmation
    #[arg(short = 'f', long = "force")]
    pub force: bool,

    /// Path to a TOML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}

pub fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let pos = s
        .find('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", s))?;
    let key = s[..pos].trim();
    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", s));
    }
    Ok((key.to_string(), s[pos + 1..].to_string()))
}

/// Parses `KEY=VALUE`; the value becomes a boolean, an integer or a string.
pub fn parse_setting(s: &str) -> Result<(String, SettingValue), String> {
    let (key, value) = parse_key_val(s)?;
    Ok((key, SettingValue::from_cli(&value)))
}

/// Collects parsed pairs into a settings map; later pairs win.
pub fn settings_from_pairs(pairs: &[(String, SettingValue)]) -> Settings {
    pairs.iter().cloned().collect()
}
