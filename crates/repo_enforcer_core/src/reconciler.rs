//! The compare-then-apply pass over an organization's repositories.
//!
//! Repositories are processed one at a time, each together with all of its
//! branches. Failures are logged with their organization, repository and
//! branch and recorded in the [`RunReport`]; they never stop the run.

use github_client::{BranchProtectionUpdate, Repository, RepositoryClient};
use tracing::{debug, error, info, instrument, warn};

use crate::confirmation::Confirmation;
use crate::exclusions::ExclusionRules;
use crate::notifier::Notifier;
use crate::settings::{
    changed_keys, describe_settings, effective_settings, settings_changed, settings_from_json,
    settings_to_json, Settings, MANDATED_BRANCH_SETTINGS, MANDATED_REPOSITORY_SETTINGS,
};

#[cfg(test)]
#[path = "reconciler_tests.rs"]
mod tests;

/// What to enforce and where.
///
/// The desired settings always contain the mandated defaults: overrides
/// supplied through the `with_*_overrides` methods are merged underneath them.
#[derive(Debug, Clone)]
pub struct EnforcementRequest {
    organization: String,
    repository: Option<String>,
    branches: Vec<String>,
    repository_settings: Settings,
    branch_settings: Settings,
}

impl EnforcementRequest {
    /// Creates a request covering every repository in the organization with
    /// the mandated settings only.
    pub fn new(organization: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            repository: None,
            branches: Vec::new(),
            repository_settings: MANDATED_REPOSITORY_SETTINGS.clone(),
            branch_settings: MANDATED_BRANCH_SETTINGS.clone(),
        }
    }

    /// Restricts the run to a single repository.
    pub fn with_repository(mut self, repository: impl Into<String>) -> Self {
        self.repository = Some(repository.into());
        self
    }

    /// Protects these branches in addition to each repository's default branch.
    pub fn with_branches(mut self, branches: impl IntoIterator<Item = String>) -> Self {
        self.branches = branches.into_iter().collect();
        self
    }

    pub fn with_repository_overrides(mut self, overrides: &Settings) -> Self {
        self.repository_settings = effective_settings(overrides, &MANDATED_REPOSITORY_SETTINGS);
        self
    }

    pub fn with_branch_overrides(mut self, overrides: &Settings) -> Self {
        self.branch_settings = effective_settings(overrides, &MANDATED_BRANCH_SETTINGS);
        self
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn repository(&self) -> Option<&str> {
        self.repository.as_deref()
    }

    pub fn branches(&self) -> &[String] {
        &self.branches
    }

    pub fn repository_settings(&self) -> &Settings {
        &self.repository_settings
    }

    pub fn branch_settings(&self) -> &Settings {
        &self.branch_settings
    }
}

/// Outcome of a run: what changed and whether anything failed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunReport {
    changes: Vec<String>,
    failed: bool,
}

impl RunReport {
    pub fn record_change(&mut self, identifier: impl Into<String>) {
        self.changes.push(identifier.into());
    }

    /// Marks the run as failed. The flag never resets.
    pub fn record_failure(&mut self) {
        self.failed = true;
    }

    /// `owner/repo` and `owner/repo#branch` identifiers, in the order they
    /// were changed.
    pub fn changes(&self) -> &[String] {
        &self.changes
    }

    pub fn has_failures(&self) -> bool {
        self.failed
    }

    /// Process exit status for this run.
    pub fn exit_code(&self) -> i32 {
        if self.failed {
            1
        } else {
            0
        }
    }
}

/// Returns the branches to protect: the requested ones followed by the
/// default branch, without duplicates.
pub fn branches_to_protect(requested: &[String], default_branch: Option<&str>) -> Vec<String> {
    let mut branches: Vec<String> = Vec::with_capacity(requested.len() + 1);
    for branch in requested.iter().map(String::as_str).chain(default_branch) {
        if !branch.is_empty() && !branches.iter().any(|b| b == branch) {
            branches.push(branch.to_string());
        }
    }
    branches
}

/// Brings repositories and branches in line with an [`EnforcementRequest`].
pub struct Reconciler<'a> {
    client: &'a dyn RepositoryClient,
    confirmation: &'a dyn Confirmation,
    exclusions: ExclusionRules,
    notifier: Option<&'a dyn Notifier>,
}

impl<'a> Reconciler<'a> {
    pub fn new(client: &'a dyn RepositoryClient, confirmation: &'a dyn Confirmation) -> Self {
        Self {
            client,
            confirmation,
            exclusions: ExclusionRules::default(),
            notifier: None,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionRules) -> Self {
        self.exclusions = exclusions;
        self
    }

    /// Sends a summary to `notifier` after runs that changed something.
    pub fn with_notifier(mut self, notifier: &'a dyn Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    /// Runs one full pass and reports what happened.
    #[instrument(skip(self, request), fields(organization = %request.organization()))]
    pub async fn run(&self, request: &EnforcementRequest) -> RunReport {
        let mut report = RunReport::default();

        let targets = match self.resolve_targets(request).await {
            Ok(targets) => targets,
            Err(e) => {
                error!(
                    organization = request.organization(),
                    repository = request.repository(),
                    error = %e,
                    "Failed to resolve the repositories to enforce"
                );
                report.record_failure();
                return report;
            }
        };

        info!(
            organization = request.organization(),
            count = targets.len(),
            "Enforcing settings"
        );

        for target in &targets {
            if let Some(reason) = self.exclusions.exclusion_reason(target) {
                info!(
                    organization = request.organization(),
                    repository = target.name(),
                    reason = %reason,
                    "Skipping repository"
                );
                continue;
            }

            self.enforce_repository(request, target, &mut report).await;
        }

        self.send_notification(request, &mut report).await;

        info!(
            organization = request.organization(),
            changes = report.changes().len(),
            failed = report.has_failures(),
            "Finished enforcing settings"
        );
        report
    }

    async fn resolve_targets(
        &self,
        request: &EnforcementRequest,
    ) -> Result<Vec<Repository>, github_client::Error> {
        let org = request.organization();
        match request.repository() {
            Some(name) => Ok(vec![self.client.get_repository(org, name).await?]),
            None => {
                self.client.get_organization(org).await?;
                self.client.list_organization_repositories(org).await
            }
        }
    }

    /// Fetches the full repository record; the organization listing leaves
    /// out the merge settings.
    async fn load_repository(
        &self,
        request: &EnforcementRequest,
        target: &Repository,
    ) -> Result<Repository, github_client::Error> {
        if request.repository().is_some() {
            return Ok(target.clone());
        }
        self.client
            .get_repository(request.organization(), target.name())
            .await
    }

    async fn enforce_repository(
        &self,
        request: &EnforcementRequest,
        target: &Repository,
        report: &mut RunReport,
    ) {
        let org = request.organization();

        let repository = match self.load_repository(request, target).await {
            Ok(repository) => repository,
            Err(e) => {
                error!(
                    organization = org,
                    repository = target.name(),
                    error = %e,
                    "Failed to read repository settings"
                );
                report.record_failure();
                return;
            }
        };
        let name = repository.name();
        let full_name = repository.full_name();

        let current = settings_from_json(repository.settings());
        let desired = request.repository_settings();
        if settings_changed(&current, desired) {
            info!(
                organization = org,
                repository = name,
                settings = ?changed_keys(&current, desired),
                "Repository settings differ"
            );

            if self.confirmation.confirm(&format!(
                "Apply repository settings to {} with {}?",
                full_name,
                describe_settings(desired)
            )) {
                match self
                    .client
                    .update_repository_settings(org, name, &settings_to_json(desired))
                    .await
                {
                    Ok(_) => {
                        info!(organization = org, repository = name, "Updated repository settings");
                        report.record_change(full_name);
                    }
                    Err(e) => {
                        error!(
                            organization = org,
                            repository = name,
                            error = %e,
                            "Failed to update repository settings"
                        );
                        report.record_failure();
                    }
                }
            } else {
                info!(organization = org, repository = name, "Repository update declined");
            }
        } else {
            debug!(organization = org, repository = name, "Repository settings are compliant");
        }

        let branches = branches_to_protect(request.branches(), repository.default_branch());
        if branches.is_empty() {
            warn!(
                organization = org,
                repository = name,
                "Repository has no default branch, skipping branch protection"
            );
        }

        for branch in &branches {
            self.enforce_branch(request, &repository, branch, report).await;
        }
    }

    async fn enforce_branch(
        &self,
        request: &EnforcementRequest,
        target: &Repository,
        branch: &str,
        report: &mut RunReport,
    ) {
        let org = request.organization();
        let repository = target.name();

        let current = match self
            .client
            .get_branch_protection(org, repository, branch)
            .await
        {
            Ok(protection) => settings_from_json(&protection.to_settings()),
            Err(e) if e.is_not_found() => {
                debug!(
                    organization = org,
                    repository = repository,
                    branch = branch,
                    "Branch is not protected"
                );
                Settings::new()
            }
            Err(e) => {
                error!(
                    organization = org,
                    repository = repository,
                    branch = branch,
                    error = %e,
                    "Failed to read branch protection"
                );
                report.record_failure();
                return;
            }
        };

        let desired = request.branch_settings();
        if !settings_changed(&current, desired) {
            debug!(
                organization = org,
                repository = repository,
                branch = branch,
                "Branch protection is compliant"
            );
            return;
        }

        info!(
            organization = org,
            repository = repository,
            branch = branch,
            settings = ?changed_keys(&current, desired),
            "Branch protection differs"
        );

        if !self.confirmation.confirm(&format!(
            "Apply branch protection to {}#{} with {}?",
            target.full_name(),
            branch,
            describe_settings(desired)
        )) {
            info!(
                organization = org,
                repository = repository,
                branch = branch,
                "Branch protection update declined"
            );
            return;
        }

        let update = BranchProtectionUpdate::from_settings(&settings_to_json(desired));
        match self
            .client
            .update_branch_protection(org, repository, branch, &update)
            .await
        {
            Ok(()) => {
                info!(
                    organization = org,
                    repository = repository,
                    branch = branch,
                    "Updated branch protection"
                );
                report.record_change(format!("{}#{}", target.full_name(), branch));
            }
            Err(e) => {
                error!(
                    organization = org,
                    repository = repository,
                    branch = branch,
                    error = %e,
                    "Failed to update branch protection"
                );
                report.record_failure();
            }
        }
    }

    async fn send_notification(&self, request: &EnforcementRequest, report: &mut RunReport) {
        let Some(notifier) = self.notifier else {
            return;
        };
        if report.changes().is_empty() {
            debug!("No changes made, not sending a notification");
            return;
        }

        if let Err(e) = notifier
            .notify(request.organization(), report.changes())
            .await
        {
            error!(
                organization = request.organization(),
                error = %e,
                "Failed to send change notification"
            );
            report.record_failure();
        }
    }
}
