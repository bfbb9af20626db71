use action_primitives::ActionError;
use consign_core_types::EntityId;
use thiserror::Error;

/// Failures of the approval workflow that stop an operator action.
#[derive(Debug, Error)]
pub enum ApprovalError {
    #[error("Invalid resale price: {0:?}")]
    InvalidPrice(String),

    #[error("No listing identifier on the page")]
    NoListing,

    #[error("No seller details captured for listing {0}")]
    CacheMiss(EntityId),

    #[error("Host page error: {0}")]
    Host(#[from] ActionError),

    #[error("Webhook error: {0}")]
    Webhook(String),
}

impl ApprovalError {
    /// Message shown to the operator when this error blocks an action.
    pub fn operator_message(&self) -> String {
        match self {
            ApprovalError::InvalidPrice(_) => {
                "Please enter a valid resale price greater than $0.".to_string()
            }
            ApprovalError::NoListing => {
                "Could not tell which listing is open. Reload the listing and try again.".to_string()
            }
            ApprovalError::CacheMiss(id) => format!(
                "Seller details for listing {id} have not been captured yet. \
                 Reload the listing page so they can be read, then publish again."
            ),
            other => other.to_string(),
        }
    }
}
