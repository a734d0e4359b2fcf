//! Error handling module
//!
//! Defines the panel error taxonomy with matching exit codes

pub mod types;

pub use types::*;
