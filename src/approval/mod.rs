//! Operator-driven approval of a pending listing.
//!
//! The operator picks a resale price; the workflow writes the derived listing and
//! shipping prices, swaps the consignor's details for the house account, reports the
//! captured consignor record to a webhook and finally lets the original approve
//! click through.

mod notify;
mod price;
mod webhook;
mod workflow;

pub use notify::{LogNotifier, OperatorNotifier};
pub use price::{PricingConfig, ResalePrice};
pub use webhook::{PayloadSink, WebhookConfig, WebhookPayload, WebhookSink};
pub use workflow::{
    AcceptReport, ApprovalConfig, ApprovalSelectors, ApprovalWorkflow, ClickDecision,
    DeliveryStatus, PublishReport,
};
