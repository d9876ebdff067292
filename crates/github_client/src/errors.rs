//! Error types for GitHub client operations.
//!
//! This module defines the errors that can occur when reading or updating
//! repository and branch protection settings through the GitHub API.

use http::StatusCode;
use tracing::error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur during GitHub client operations.
///
/// The enforcer treats [`Error::NotFound`] on a branch protection read as
/// "no protection configured"; every other variant is a failed API call.
///
/// ## Examples
///
/// ```rust,ignore
/// use github_client::Error;
///
/// match client.get_branch_protection("org", "repo", "main").await {
///     Ok(protection) => println!("protected: {:?}", protection),
///     Err(Error::NotFound) => println!("branch is not protected"),
///     Err(err) => eprintln!("Other error: {}", err),
/// }
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A GitHub API request failed.
    ///
    /// The contained string is the message GitHub (or the transport) reported.
    #[error("API request failed: {0}")]
    ApiError(String),

    /// Authentication or GitHub client initialization failure.
    ///
    /// This error occurs when the access token is rejected or the underlying
    /// `octocrab` client cannot be built.
    #[error("Failed to authenticate or initialize GitHub client: {0}")]
    AuthError(String),

    /// Error deserializing the response from GitHub.
    #[error("Failed to deserialize GitHub response: {0}")]
    Deserialization(#[from] serde_json::Error),

    /// The GitHub API returned a response in an unexpected format.
    #[error("Invalid response format")]
    InvalidResponse,

    /// The requested resource was not found.
    ///
    /// Returned for HTTP 404. For branch protection this means the branch has
    /// no protection rules.
    #[error("Resource not found")]
    NotFound,

    /// GitHub API rate limit has been exceeded.
    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

impl Error {
    /// Returns `true` when the error means the resource does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound)
    }
}

/// Logs an octocrab error with as much context as is available and converts
/// it into an [`Error`].
pub(crate) fn from_octocrab_error(message: &str, e: octocrab::Error) -> Error {
    match e {
        octocrab::Error::GitHub { source, backtrace } => {
            let status = source.status_code;
            if status == StatusCode::NOT_FOUND {
                // Absence is an expected answer for several lookups; let the caller decide.
                return Error::NotFound;
            }

            error!(
                status = status.as_u16(),
                error_message = source.message,
                backtrace = backtrace.to_string(),
                "{}. Received an error from GitHub",
                message
            );

            if status == StatusCode::UNAUTHORIZED {
                Error::AuthError(source.message)
            } else if status == StatusCode::TOO_MANY_REQUESTS
                || (status == StatusCode::FORBIDDEN
                    && source.message.to_lowercase().contains("rate limit"))
            {
                Error::RateLimitExceeded
            } else {
                Error::ApiError(source.message)
            }
        }
        octocrab::Error::Serde { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. Failed to deserialize the response.",
                message
            );
            Error::Deserialization(source)
        }
        octocrab::Error::Json { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. The response was not valid JSON.",
                message
            );
            Error::InvalidResponse
        }
        octocrab::Error::UriParse { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. Failed to parse URI.",
                message
            );
            Error::ApiError(source.to_string())
        }
        octocrab::Error::InvalidHeaderValue { source, backtrace } => {
            error!(
                error_message = source.to_string(),
                backtrace = backtrace.to_string(),
                "{}. One of the header values was invalid.",
                message
            );
            Error::AuthError(source.to_string())
        }
        _ => {
            error!(error_message = e.to_string(), message);
            Error::ApiError(e.to_string())
        }
    }
}
