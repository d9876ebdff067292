//! Confirmation strategies consulted before every settings change.

use std::collections::VecDeque;
use std::sync::Mutex;

#[cfg(test)]
#[path = "confirmation_tests.rs"]
mod tests;

/// Decides whether a pending change may be applied.
pub trait Confirmation: Send + Sync {
    /// Returns `true` when the change described by `prompt` should go ahead.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Approves every change without asking. Used for forced runs.
#[derive(Debug, Default, Clone, Copy)]
pub struct AlwaysConfirm;

impl Confirmation for AlwaysConfirm {
    fn confirm(&self, _prompt: &str) -> bool {
        true
    }
}

/// Replays a fixed sequence of answers, declining once they run out.
///
/// Useful for dry runs driven from a file as well as tests.
#[derive(Debug, Default)]
pub struct ScriptedConfirmation {
    answers: Mutex<VecDeque<bool>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedConfirmation {
    pub fn new(answers: impl IntoIterator<Item = bool>) -> Self {
        Self {
            answers: Mutex::new(answers.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Returns the prompts seen so far, in order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|prompts| prompts.clone())
            .unwrap_or_default()
    }
}

impl Confirmation for ScriptedConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        self.answers
            .lock()
            .ok()
            .and_then(|mut answers| answers.pop_front())
            .unwrap_or(false)
    }
}

/// Interprets a line typed by the user. Only `y` and `yes` count as approval.
pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
