use crate::error::{GitSopsError, Result};
use dialoguer::Confirm as DialoguerConfirm;

/// Yes/no question asked to the user.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Asks on the terminal, defaulting to "no".
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        DialoguerConfirm::new()
            .with_prompt(prompt)
            .default(false)
            .interact()
            .map_err(|e| GitSopsError::Prompt(e.to_string()))
    }
}
