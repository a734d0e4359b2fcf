//! User prompts
//!
//! Confirmation and the add-org wizard go through the `Prompter` trait so
//! the dispatcher can run against a terminal, a scripted test double, or a
//! host that cannot prompt at all.

pub mod add_org;
pub mod scripted;
pub mod terminal;

pub use add_org::{AddOrgDefaults, AddOrgRequest, InstanceChoice, OrgKind, run_add_org_wizard};
pub use scripted::{Answer, ScriptedPrompter};
pub use terminal::TerminalPrompter;

use crate::error::PanelError;
use anyhow::Result;

/// Source of answers to questions asked during an action
pub trait Prompter {
    /// Yes/no question
    fn confirm(&self, message: &str) -> Result<bool>;

    /// Pick one of `items`, returning its index
    fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize>;

    /// Free-text answer
    fn input(&self, message: &str, default: Option<&str>) -> Result<String>;
}

impl<P: Prompter + ?Sized> Prompter for &P {
    fn confirm(&self, message: &str) -> Result<bool> {
        (**self).confirm(message)
    }

    fn select(&self, message: &str, items: &[&str], default: usize) -> Result<usize> {
        (**self).select(message, items, default)
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        (**self).input(message, default)
    }
}

/// Prompter for hosts that cannot ask questions
///
/// Every question fails with `Cancelled`; callers must send the answers
/// up front (a confirmed flag, or the wizard fields).
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPrompter;

impl Prompter for NoPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        Err(PanelError::cancelled(format!("confirmation required: {message}")).into())
    }

    fn select(&self, message: &str, _items: &[&str], _default: usize) -> Result<usize> {
        Err(PanelError::cancelled(format!("no answer for: {message}")).into())
    }

    fn input(&self, message: &str, _default: Option<&str>) -> Result<String> {
        Err(PanelError::cancelled(format!("no answer for: {message}")).into())
    }
}
