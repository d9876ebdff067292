//! Interactive confirmation on the console.

use std::io::{self, BufRead, Write};

use repo_enforcer_core::{is_affirmative, Confirmation};
use tracing::warn;

use crate::errors::Error;

#[cfg(test)]
#[path = "prompt_tests.rs"]
mod tests;

/// Asks the user on stdout and reads the answer from stdin.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsolePrompt;

impl Confirmation for ConsolePrompt {
    fn confirm(&self, prompt: &str) -> bool {
        let stdin = io::stdin();
        let mut output = io::stdout();
        match ask_yes_no(prompt, &mut stdin.lock(), &mut output) {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "Could not read confirmation, treating it as no");
                false
            }
        }
    }
}

/// Writes `prompt` with a `[y/N]` suffix and reads one line of input.
///
/// End of input counts as no.
pub fn ask_yes_no<R: BufRead, W: Write>(
    prompt: &str,
    input: &mut R,
    output: &mut W,
) -> Result<bool, Error> {
    write!(output, "{} [y/N] ", prompt).map_err(|_| Error::StdOutFlushFailed)?;
    output.flush().map_err(|_| Error::StdOutFlushFailed)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(Error::ReadInput)?;
    Ok(is_affirmative(&answer))
}
