//! Confirmation prompt abstraction.
//!
//! Commands take a `ConfirmPrompt` instead of reading the terminal directly;
//! tests script the answer.

use anyhow::Result;

/// A yes/no question put to the user.
pub trait ConfirmPrompt {
    fn confirm(&self, message: &str) -> Result<bool>;
}

/// Interactive prompt on the controlling terminal. No default answer: the
/// user has to type an explicit yes or no.
pub struct TerminalPrompt;

impl ConfirmPrompt for TerminalPrompt {
    fn confirm(&self, message: &str) -> Result<bool> {
        let answer = dialoguer::Confirm::new()
            .with_prompt(message)
            .interact()?;
        Ok(answer)
    }
}
