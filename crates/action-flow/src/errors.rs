//! Flow construction error types

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FlowError {
    /// Plan or step shape is inconsistent
    #[error("Invalid flow structure: {0}")]
    InvalidStructure(String),
}
