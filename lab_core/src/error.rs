//! Error types for lab sessions
//!
//! Every variant is user-correctable: the host shows a prompt and the session
//! carries on.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, LabError>;

/// Lab error taxonomy
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LabError {
    /// Entered text is not a number
    #[error("'{input}' is not a valid number")]
    Parse {
        /// The raw text as typed
        input: String,
    },

    /// Formula evaluated outside its defined domain
    #[error("value out of range: {0}")]
    Domain(String),

    /// Action invoked before the setup it depends on
    #[error("not ready yet: {0}")]
    EmptyState(String),
}

impl LabError {
    pub fn parse(input: impl Into<String>) -> Self {
        Self::Parse {
            input: input.into(),
        }
    }

    pub fn domain(reason: impl Into<String>) -> Self {
        Self::Domain(reason.into())
    }

    pub fn empty_state(reason: impl Into<String>) -> Self {
        Self::EmptyState(reason.into())
    }

    /// None of the lab errors end a session.
    pub fn is_user_correctable(&self) -> bool {
        true
    }

    /// Short prompt title for the host notice
    pub fn title(&self) -> &'static str {
        match self {
            Self::Parse { .. } => "Invalid number",
            Self::Domain(_) => "Invalid input",
            Self::EmptyState(_) => "Not ready",
        }
    }
}
