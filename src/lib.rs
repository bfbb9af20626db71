//! Consignment approval automation for a third-party listings dashboard.
//!
//! The workspace crates provide the pieces (waiting, controlled input, step
//! sequencing, response observation, display reconciliation, a Chromium host);
//! this crate wires them into the operator workflow and the `consign-pilot` CLI.

pub mod approval;
pub mod cli;
pub mod config;
pub mod context;
pub mod errors;
pub mod plan;
pub mod route_guard;

pub use config::Config;
pub use context::{AutomationContext, ReentrancyGuard};
pub use errors::ApprovalError;
pub use route_guard::{ListingSession, RouteConfig, RouteGuard, RouteTransition};
