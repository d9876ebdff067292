//! Crate for interacting with the GitHub REST API.
//!
//! This crate provides a client for reading and updating repository merge
//! settings and branch protection rules, authenticating with a personal access
//! token. The [`RepositoryClient`] trait is the seam the enforcer works
//! against so that it can be exercised without a live GitHub.

use async_trait::async_trait;
use octocrab::{Octocrab, Page, Result as OctocrabResult};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, info, instrument};

pub mod errors;
pub use errors::Error;
use errors::from_octocrab_error;

pub mod branch_protection;
pub use branch_protection::{BranchProtection, BranchProtectionUpdate, PullRequestReviews};

pub mod repository;
pub use repository::{Organization, Repository};

// Reference the tests module in the separate file
#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;

/// Number of repositories requested per page when enumerating an organization.
const REPOSITORIES_PER_PAGE: u8 = 100;

/// Query parameters for the organization repository listing.
#[derive(Debug, Serialize)]
struct ListRepositoriesParams {
    per_page: u8,
}

/// A client for interacting with the GitHub API.
#[derive(Debug)]
pub struct GitHubClient {
    client: Octocrab,
}

impl GitHubClient {
    /// Creates a new `GitHubClient` around an authenticated `Octocrab` instance.
    ///
    /// Use [`create_token_client`] to build the `Octocrab` instance from a
    /// personal access token.
    pub fn new(client: Octocrab) -> Self {
        Self { client }
    }
}

/// Trait for the repository and branch protection operations the enforcer needs.
#[async_trait]
pub trait RepositoryClient: Send + Sync {
    /// Looks up an organization.
    ///
    /// # Errors
    /// Returns `Error::NotFound` if the organization does not exist or is not
    /// visible with the current token.
    async fn get_organization(&self, org_name: &str) -> Result<Organization, Error>;

    /// Lists every repository in the organization, following pagination.
    ///
    /// The listing endpoint leaves out the merge settings; use
    /// [`RepositoryClient::get_repository`] for the full record.
    async fn list_organization_repositories(
        &self,
        org_name: &str,
    ) -> Result<Vec<Repository>, Error>;

    /// Fetches a single repository with every setting GitHub reports.
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error>;

    /// Updates settings for a specific repository.
    ///
    /// Only the keys present in `settings` are sent.
    ///
    /// # Arguments
    ///
    /// * `owner` - The owner of the repository (user or organization name).
    /// * `repo` - The name of the repository.
    /// * `settings` - REST API field names mapped to their new values.
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &Map<String, Value>,
    ) -> Result<Repository, Error>;

    /// Reads the protection rules of a branch.
    ///
    /// # Errors
    /// Returns `Error::NotFound` when the branch has no protection.
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error>;

    /// Replaces the protection rules of a branch.
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        update: &BranchProtectionUpdate,
    ) -> Result<(), Error>;
}

#[async_trait]
impl RepositoryClient for GitHubClient {
    #[instrument(skip(self), fields(org_name = %org_name))]
    async fn get_organization(&self, org_name: &str) -> Result<Organization, Error> {
        let path = format!("/orgs/{}", org_name);

        debug!("Making API call to: {}", path);
        let response: OctocrabResult<Value> = self.client.get(path, None::<&()>).await;

        let org_data = response
            .map_err(|e| from_octocrab_error("Failed to get organization information", e))?;

        let name = org_data
            .get("login")
            .and_then(|v| v.as_str())
            .ok_or(Error::InvalidResponse)?
            .to_string();

        info!(org_name = org_name, "Found organization");
        Ok(Organization { name })
    }

    #[instrument(skip(self), fields(org_name = %org_name))]
    async fn list_organization_repositories(
        &self,
        org_name: &str,
    ) -> Result<Vec<Repository>, Error> {
        let path = format!("/orgs/{}/repos", org_name);
        let first_page: Page<Repository> = self
            .client
            .get(
                path,
                Some(&ListRepositoriesParams {
                    per_page: REPOSITORIES_PER_PAGE,
                }),
            )
            .await
            .map_err(|e| from_octocrab_error("Failed to list organization repositories", e))?;

        let repositories = self
            .client
            .all_pages(first_page)
            .await
            .map_err(|e| from_octocrab_error("Failed to fetch the next repository page", e))?;

        info!(
            org_name = org_name,
            count = repositories.len(),
            "Retrieved organization repositories"
        );

        Ok(repositories)
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo))]
    async fn get_repository(&self, owner: &str, repo: &str) -> Result<Repository, Error> {
        let path = format!("/repos/{}/{}", owner, repo);
        let response: OctocrabResult<Repository> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| from_octocrab_error("Failed to get repository", e))
    }

    #[instrument(skip(self, settings), fields(owner = %owner, repo = %repo))]
    async fn update_repository_settings(
        &self,
        owner: &str,
        repo: &str,
        settings: &Map<String, Value>,
    ) -> Result<Repository, Error> {
        let path = format!("/repos/{}/{}", owner, repo);
        let response: OctocrabResult<Repository> = self.client.patch(path, Some(settings)).await;
        response.map_err(|e| from_octocrab_error("Failed to update repository settings", e))
    }

    #[instrument(skip(self), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn get_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
    ) -> Result<BranchProtection, Error> {
        let path = format!("/repos/{}/{}/branches/{}/protection", owner, repo, branch);
        let response: OctocrabResult<BranchProtection> = self.client.get(path, None::<&()>).await;
        response.map_err(|e| from_octocrab_error("Failed to get branch protection", e))
    }

    #[instrument(skip(self, update), fields(owner = %owner, repo = %repo, branch = %branch))]
    async fn update_branch_protection(
        &self,
        owner: &str,
        repo: &str,
        branch: &str,
        update: &BranchProtectionUpdate,
    ) -> Result<(), Error> {
        let path = format!("/repos/{}/{}/branches/{}/protection", owner, repo, branch);

        debug!(payload = ?update.payload(), "Sending branch protection payload");
        let response: OctocrabResult<Value> = self.client.put(path, Some(update)).await;
        response
            .map(|_| ())
            .map_err(|e| from_octocrab_error("Failed to update branch protection", e))
    }
}

/// Creates an `Octocrab` client authenticated with a personal access token.
///
/// # Errors
/// Returns `Error::AuthError` if the client cannot be built.
#[instrument(skip(token))]
pub fn create_token_client(token: &str) -> Result<Octocrab, Error> {
    Octocrab::builder()
        .personal_token(token.to_string())
        .build()
        .map_err(|e| Error::AuthError(e.to_string()))
}
