//! Rules deciding which repositories are left alone.

use std::fmt;

use github_client::Repository;

#[cfg(test)]
#[path = "exclusions_tests.rs"]
mod tests;

/// Repositories whose name starts with any of these are never enforced.
///
/// Entries that look like full repository names are matched as prefixes too,
/// so `PCBViewer` also covers `PCBViewer-legacy`.
pub const EXCLUDED_PREFIXES: [&str; 15] = [
    "try-",
    "demo-",
    "example-",
    "nexar-bridge-notes",
    "nexar-client-cs",
    "nexar-client-login",
    "nexar-client-token",
    "nexar-gists",
    "nexar-manufacture-test-ss",
    "nexar-templates",
    "nexar-token-cs",
    "nexar-try-cpp",
    "nexar-tye",
    "PCBViewer",
    "tf-deploy-account-baseline",
];

/// Why a repository was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    Archived,
    Prefix(String),
    Name(String),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionReason::Archived => write!(f, "repository is archived"),
            ExclusionReason::Prefix(prefix) => write!(f, "name starts with `{}`", prefix),
            ExclusionReason::Name(name) => write!(f, "`{}` is excluded by name", name),
        }
    }
}

/// The set of excluded name prefixes and exact names.
///
/// The built-in prefixes are always present; configuration can only add
/// prefixes and exact names on top of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionRules {
    prefixes: Vec<String>,
    names: Vec<String>,
}

impl Default for ExclusionRules {
    fn default() -> Self {
        Self {
            prefixes: EXCLUDED_PREFIXES.iter().map(|p| p.to_string()).collect(),
            names: Vec::new(),
        }
    }
}

impl ExclusionRules {
    /// Adds prefixes and exact names on top of the built-in rules.
    pub fn with_additional<P, N>(mut self, prefixes: P, names: N) -> Self
    where
        P: IntoIterator<Item = String>,
        N: IntoIterator<Item = String>,
    {
        for prefix in prefixes {
            if !prefix.is_empty() && !self.prefixes.contains(&prefix) {
                self.prefixes.push(prefix);
            }
        }
        for name in names {
            if !name.is_empty() && !self.names.contains(&name) {
                self.names.push(name);
            }
        }
        self
    }

    /// Checks a repository name against the prefix and exact-name rules.
    pub fn name_exclusion(&self, name: &str) -> Option<ExclusionReason> {
        if let Some(prefix) = self.prefixes.iter().find(|p| name.starts_with(p.as_str())) {
            return Some(ExclusionReason::Prefix(prefix.clone()));
        }

        self.names
            .iter()
            .find(|n| n.as_str() == name)
            .map(|n| ExclusionReason::Name(n.clone()))
    }

    /// Returns the reason the repository must be skipped, if any.
    pub fn exclusion_reason(&self, repository: &Repository) -> Option<ExclusionReason> {
        if repository.is_archived() {
            return Some(ExclusionReason::Archived);
        }
        self.name_exclusion(repository.name())
    }
}
