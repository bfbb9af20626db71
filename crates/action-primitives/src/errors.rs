//! Error types for action primitives

use thiserror::Error;

/// Failures surfaced by host page operations and waits
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ActionError {
    /// Selector never matched within the wait budget
    #[error("Element not found: '{selector}' after {elapsed_ms}ms")]
    NotFound { selector: String, elapsed_ms: u64 },

    /// Handle refers to an element that is no longer mounted
    #[error("Element detached: {0}")]
    Detached(String),

    /// Script evaluation inside the page failed
    #[error("Script error: {0}")]
    Script(String),

    /// Transport or protocol failure talking to the host
    #[error("Host I/O error: {0}")]
    HostIo(String),
}

impl ActionError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ActionError::NotFound { .. })
    }
}
