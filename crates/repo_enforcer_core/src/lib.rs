//! Enforcement of organization-wide repository and branch protection settings.
//!
//! The [`Reconciler`] walks the repositories of an organization, compares the
//! live settings of each repository and its protected branches with the
//! mandated configuration, and applies the difference after asking a
//! [`Confirmation`] strategy. Changes can be summarised through a [`Notifier`].
//!
//! ```rust,no_run
//! use github_client::{create_token_client, GitHubClient};
//! use repo_enforcer_core::{AlwaysConfirm, EnforcementRequest, Reconciler};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GitHubClient::new(create_token_client("ghp_...")?);
//! let confirmation = AlwaysConfirm;
//!
//! let request = EnforcementRequest::new("my-org").with_branches(vec!["develop".to_string()]);
//! let report = Reconciler::new(&client, &confirmation).run(&request).await;
//!
//! std::process::exit(report.exit_code());
//! # }
//! ```

pub mod confirmation;
pub mod errors;
pub mod exclusions;
pub mod notifier;
pub mod reconciler;
pub mod settings;

pub use confirmation::{is_affirmative, AlwaysConfirm, Confirmation, ScriptedConfirmation};
pub use errors::Error;
pub use exclusions::{ExclusionReason, ExclusionRules};
pub use notifier::{Notifier, SlackAttachment, SlackField, SlackMessage, SlackNotifier};
pub use reconciler::{branches_to_protect, EnforcementRequest, Reconciler, RunReport};
pub use settings::{
    changed_keys, describe_settings, effective_settings, settings_changed, SettingValue, Settings,
    MANDATED_BRANCH_SETTINGS, MANDATED_REPOSITORY_SETTINGS,
};
