//! Error types for settings enforcement.

use thiserror::Error;

#[cfg(test)]
#[path = "errors_tests.rs"]
mod tests;

/// Errors that can occur while enforcing organization settings.
///
/// Failures during a run are logged and folded into the run report instead
/// of being returned. Only the notifier reports errors to its caller.
#[derive(Error, Debug)]
pub enum Error {
    /// The change notification could not be delivered.
    #[error("Failed to send notification: {0}")]
    Notification(String),
}
