//! Prompter that replays canned answers

use super::Prompter;
use crate::error::PanelError;
use anyhow::Result;
use std::cell::RefCell;
use std::collections::VecDeque;

/// One canned answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    Confirm(bool),
    Select(usize),
    Input(String),
}

/// Answers questions in order from a fixed script
///
/// Asking a question of the wrong kind, or running out of answers, is a
/// `Cancelled` error. Every question asked is recorded.
#[derive(Debug, Default)]
pub struct ScriptedPrompter {
    answers: RefCell<VecDeque<Answer>>,
    asked: RefCell<Vec<String>>,
}

impl ScriptedPrompter {
    #[must_use]
    pub fn new<I: IntoIterator<Item = Answer>>(answers: I) -> Self {
        Self {
            answers: RefCell::new(answers.into_iter().collect()),
            asked: RefCell::new(Vec::new()),
        }
    }

    /// Questions asked so far
    #[must_use]
    pub fn asked(&self) -> Vec<String> {
        self.asked.borrow().clone()
    }

    fn next(&self, message: &str) -> Result<Answer> {
        self.asked.borrow_mut().push(message.to_owned());
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| PanelError::cancelled(format!("no scripted answer for: {message}")).into())
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm(&self, message: &str) -> Result<bool> {
        match self.next(message)? {
            Answer::Confirm(answer) => Ok(answer),
            other => Err(PanelError::cancelled(format!("expected a confirmation, got {other:?}")).into()),
        }
    }

    fn select(&self, message: &str, items: &[&str], _default: usize) -> Result<usize> {
        match self.next(message)? {
            Answer::Select(index) if index < items.len() => Ok(index),
            other => Err(PanelError::cancelled(format!("expected a selection, got {other:?}")).into()),
        }
    }

    fn input(&self, message: &str, default: Option<&str>) -> Result<String> {
        match self.next(message)? {
            Answer::Input(text) if text.is_empty() => Ok(default.unwrap_or_default().to_owned()),
            Answer::Input(text) => Ok(text),
            other => Err(PanelError::cancelled(format!("expected text input, got {other:?}")).into()),
        }
    }
}
