//! repo-enforcer CLI library exports for integration testing.

pub mod args;
pub mod config;
pub mod enforce;
pub mod errors;
pub mod prompt;
