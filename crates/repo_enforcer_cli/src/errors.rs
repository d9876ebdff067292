use std::io;

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur in the repo-enforcer CLI application.
///
/// Failures of individual repositories or branches are not represented here;
/// they are logged during the run and reflected in the exit status.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error occurred while loading or parsing configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// No GitHub token was supplied on the command line or in the environment.
    #[error("No GitHub token provided. Use --token or set GITHUB_TOKEN.")]
    MissingToken,

    /// The GitHub client could not be created.
    #[error("GitHub client error: {0}")]
    GitHub(#[from] github_client::Error),

    /// The enforcement run could not be set up.
    #[error("Enforcement error: {0}")]
    Enforcement(#[from] repo_enforcer_core::Error),

    /// Failed to read the answer to a confirmation prompt.
    #[error("Failed to read from standard input.")]
    ReadInput(io::Error),

    /// Failed to flush the standard output buffer.
    #[error("Failed to flush the std out buffer.")]
    StdOutFlushFailed,
}
