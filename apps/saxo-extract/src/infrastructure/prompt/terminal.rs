//! Interactive two-factor prompt on the terminal.

use dialoguer::Input;
use dialoguer::console::Term;

use crate::application::ports::{TwoFactorError, TwoFactorPort};
use crate::domain::TwoFactorCode;

/// Prompt text shown to the operator.
pub const PROMPT: &str = "Enter two factor code (six digits)";

/// Reads the code from stderr's terminal so stdout stays free for output.
#[derive(Debug)]
pub struct TerminalTwoFactorPrompt {
    term: Term,
}

impl Default for TerminalTwoFactorPrompt {
    fn default() -> Self {
        Self {
            term: Term::stderr(),
        }
    }
}

impl TerminalTwoFactorPrompt {
    /// Prompt on stderr.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl TwoFactorPort for TerminalTwoFactorPrompt {
    fn request_code(&mut self) -> Result<TwoFactorCode, TwoFactorError> {
        let input: String = Input::new()
            .with_prompt(PROMPT)
            .validate_with(|s: &String| TwoFactorCode::parse(s).map(|_| ()))
            .interact_text_on(&self.term)
            .map_err(|e| TwoFactorError::Io(e.to_string()))?;
        TwoFactorCode::parse(&input).map_err(|e| TwoFactorError::Invalid(e.to_string()))
    }
}
