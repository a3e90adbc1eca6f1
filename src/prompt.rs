//! Yes/no confirmation prompts.
//!
//! Commands ask through [`Prompter`] so that tests and automation can answer
//! without a terminal. [`TerminalPrompter`] uses `dialoguer`.

use std::sync::Mutex;

use dialoguer::{theme::ColorfulTheme, Confirm};

use crate::error::{Error, Result};

/// Asks the user to confirm an action.
pub trait Prompter: Send + Sync {
    /// Asks `message`, returning `default` when the user just presses enter.
    fn confirm(&self, message: &str, default: bool) -> Result<bool>;

    /// Whether a person can answer prompts right now.
    fn is_interactive(&self) -> bool;
}

/// Prompts on the controlling terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompter;

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str, default: bool) -> Result<bool> {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(message)
            .default(default)
            .interact()
            .map_err(|e| Error::Prompt {
                message: e.to_string(),
            })
    }

    fn is_interactive(&self) -> bool {
        console::Term::stderr().is_term()
    }
}

/// Gives the same answer to every question and remembers what was asked.
#[derive(Debug)]
pub struct StaticPrompter {
    answer: bool,
    asked: Mutex<Vec<String>>,
}

impl StaticPrompter {
    pub fn new(answer: bool) -> Self {
        Self {
            answer,
            asked: Mutex::new(Vec::new()),
        }
    }

    /// Questions asked so far, in order.
    pub fn asked(&self) -> Vec<String> {
        self.asked
            .lock()
            .map(|asked| asked.clone())
            .unwrap_or_default()
    }
}

impl Prompter for StaticPrompter {
    fn confirm(&self, message: &str, _default: bool) -> Result<bool> {
        self.asked
            .lock()
            .map_err(|_| Error::LockPoisoned {
                context: "prompt history".to_string(),
            })?
            .push(message.to_string());
        Ok(self.answer)
    }

    fn is_interactive(&self) -> bool {
        true
    }
}
