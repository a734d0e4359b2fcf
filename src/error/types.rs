//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for orgdeck operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PanelError {
    /// Configuration Error - missing or invalid settings
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Subprocess Error - the external CLI could not be spawned or reported failure
    #[error("Command failed: {message}")]
    Subprocess { message: String },

    /// Parse Error - the external CLI emitted output we could not decode
    #[error("Unexpected CLI output: {message}")]
    Parse { message: String },

    /// Missing Field Error - an expected JSON field was absent
    #[error("No value for {field}: {message}")]
    MissingField { field: String, message: String },

    /// Unknown Org - no cached org has this identifier
    #[error("Unknown org '{id}'. Run `orgdeck list --refresh` to update the cached list")]
    UnknownOrg { id: String },

    /// State Error - the persisted state could not be read or written
    #[error("State error: {message}")]
    State { message: String },

    /// Cancelled - the user aborted a prompt
    #[error("Cancelled: {message}")]
    Cancelled { message: String },
}

impl PanelError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::Configuration { .. } => 1,
            Self::Subprocess { .. } => 2,
            Self::Parse { .. } => 3,
            Self::MissingField { .. } => 4,
            Self::State { .. } => 5,
            Self::UnknownOrg { .. } => 6,
            Self::Cancelled { .. } => 130,
        }
    }

    /// Create a configuration error
    #[inline]
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a subprocess error
    #[inline]
    pub fn subprocess<S: Into<String>>(message: S) -> Self {
        Self::Subprocess {
            message: message.into(),
        }
    }

    /// Create a parse error
    #[inline]
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a missing-field error
    #[inline]
    pub fn missing_field<F: Into<String>, S: Into<String>>(field: F, message: S) -> Self {
        Self::MissingField {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create an unknown-org error
    #[inline]
    pub fn unknown_org<S: Into<String>>(id: S) -> Self {
        Self::UnknownOrg { id: id.into() }
    }

    /// Create a state error
    #[inline]
    pub fn state<S: Into<String>>(message: S) -> Self {
        Self::State {
            message: message.into(),
        }
    }

    /// Create a cancellation error
    #[inline]
    pub fn cancelled<S: Into<String>>(message: S) -> Self {
        Self::Cancelled {
            message: message.into(),
        }
    }
}
