//! The enforcement command.
//!
//! Merges the configuration file with the command line, resolves the GitHub
//! token, asks for a top-level confirmation unless forced, and hands the
//! request to the [`Reconciler`].

use github_client::{create_token_client, GitHubClient};
use repo_enforcer_core::{
    describe_settings, AlwaysConfirm, Confirmation, EnforcementRequest, ExclusionRules,
    Reconciler, SlackNotifier,
};
use tracing::{debug, info};

use crate::{args::settings_from_pairs, args::Cli, config::AppConfig, errors::Error};

#[cfg(test)]
#[path = "enforce_tests.rs"]
mod tests;

/// Everything needed for one run, after merging config and arguments.
#[derive(Debug, Clone)]
pub struct EnforcementPlan {
    pub request: EnforcementRequest,
    pub slack_webhook: Option<String>,
    pub exclusions: ExclusionRules,
}

/// Combines the configuration file and the command line.
///
/// Command line settings override configured ones; command line branches are
/// appended to the configured branches. Mandated settings are applied last by
/// [`EnforcementRequest`].
pub fn build_plan(cli: &Cli, config: &AppConfig) -> EnforcementPlan {
    let mut repository_overrides = config.repository_settings.clone();
    repository_overrides.extend(settings_from_pairs(&cli.repo_settings));

    let mut branch_overrides = config.branch_settings.clone();
    branch_overrides.extend(settings_from_pairs(&cli.branch_settings));

    let branches = config
        .branches
        .iter()
        .chain(cli.branches.iter())
        .cloned()
        .collect::<Vec<_>>();

    let mut request = EnforcementRequest::new(cli.organization.clone())
        .with_branches(branches)
        .with_repository_overrides(&repository_overrides)
        .with_branch_overrides(&branch_overrides);
    if let Some(name) = &cli.repo_name {
        request = request.with_repository(name.clone());
    }

    EnforcementPlan {
        request,
        slack_webhook: cli
            .slack_webhook
            .clone()
            .or_else(|| config.slack_webhook.clone()),
        exclusions: config.exclusion_rules(),
    }
}

/// Returns the token when one was given and it is not blank.
pub fn resolve_token(token: Option<&str>) -> Result<&str, Error> {
    match token.map(str::trim) {
        Some(t) if !t.is_empty() => Ok(t),
        _ => Err(Error::MissingToken),
    }
}

/// Text of the question asked before anything is processed.
///
/// Lists the effective settings since applying them may overwrite existing
/// configuration.
pub fn target_prompt(request: &EnforcementRequest) -> String {
    format!(
        "Enforce settings on {} in {}?\nrepository settings: {}\nbranch settings: {}\nProceed?",
        request.repository().unwrap_or("all repositories"),
        request.organization(),
        describe_settings(request.repository_settings()),
        describe_settings(request.branch_settings())
    )
}

/// Runs the enforcement described by `cli` and returns the process exit code.
///
/// `prompt` answers the top-level question and, unless `--force` was given,
/// every per-repository and per-branch question.
pub async fn execute(cli: &Cli, prompt: &dyn Confirmation) -> Result<i32, Error> {
    let config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    let plan = build_plan(cli, &config);
    let token = resolve_token(cli.token.as_deref())?;

    let notifier = plan
        .slack_webhook
        .as_deref()
        .map(SlackNotifier::new)
        .transpose()?;

    if cli.force {
        info!(
            organization = plan.request.organization(),
            repository_settings = %describe_settings(plan.request.repository_settings()),
            branch_settings = %describe_settings(plan.request.branch_settings()),
            "Enforcing without confirmation"
        );
    } else if !prompt.confirm(&target_prompt(&plan.request)) {
        info!(
            organization = plan.request.organization(),
            "Enforcement cancelled by user"
        );
        return Ok(0);
    }

    debug!(
        organization = plan.request.organization(),
        repository = ?plan.request.repository(),
        branches = ?plan.request.branches(),
        "Starting enforcement"
    );

    let client = GitHubClient::new(create_token_client(token)?);
    let confirmation: &dyn Confirmation = if cli.force { &AlwaysConfirm } else { prompt };

    let mut reconciler = Reconciler::new(&client, confirmation).with_exclusions(plan.exclusions);
    if let Some(notifier) = &notifier {
        reconciler = reconciler.with_notifier(notifier);
    }

    let report = reconciler.run(&plan.request).await;
    info!(
        changes = report.changes().len(),
        failed = report.has_failures(),
        "Enforcement finished"
    );

    Ok(report.exit_code())
}
