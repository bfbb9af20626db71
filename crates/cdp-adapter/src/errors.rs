use std::fmt;

use action_primitives::ActionError;
use chromiumoxide::error::CdpError;
use thiserror::Error;

#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum AdapterErrorKind {
    #[error("browser launch failed")]
    Launch,
    #[error("cdp i/o failure")]
    CdpIo,
    #[error("no usable page")]
    NoPage,
    #[error("internal error")]
    Internal,
}

/// Failure talking to the browser, with an optional hint for the operator.
#[derive(Clone, Debug)]
pub struct AdapterError {
    pub kind: AdapterErrorKind,
    pub hint: Option<String>,
}

impl fmt::Display for AdapterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, ": {}", hint)?;
        }
        Ok(())
    }
}

impl std::error::Error for AdapterError {}

impl AdapterError {
    pub fn new(kind: AdapterErrorKind) -> Self {
        Self { kind, hint: None }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl From<CdpError> for AdapterError {
    fn from(err: CdpError) -> Self {
        AdapterError::new(AdapterErrorKind::CdpIo).with_hint(err.to_string())
    }
}

pub(crate) fn host_io(err: CdpError) -> ActionError {
    ActionError::HostIo(err.to_string())
}
