//! Interactive terminal prompts

use super::Prompter;
use crate::error::PanelError;
use anyhow::Result;
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

/// `Prompter` backed by dialoguer on stderr
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

fn aborted(err: dialoguer::Error) -> anyhow::Error {
    PanelError::cancelled(format!("prompt aborted: {err}")).into()
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        Confirm::with_theme(&self.theme)
            .with_prompt(message)
            .default(false)
            .interact()
            .map_err(aborted)
    }

    fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize> {
        Select::with_theme(&self.theme)
            .with_prompt(message)
            .items(items)
            .default(default)
            .interact()
            .map_err(aborted)
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        let mut input = Input::<String>::with_theme(&self.theme).with_prompt(message);
        if let Some(default) = default {
            input = input.default(default.to_owned());
        }
        input.interact_text().map_err(aborted)
    }
}
