//! Operator prompts.

mod terminal;

pub use terminal::TerminalTwoFactorPrompt;
