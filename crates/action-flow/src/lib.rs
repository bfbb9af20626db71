//! Step sequencing for reveal → wait → fill → confirm automations.
//!
//! A plan is executed strictly in order with fixed pacing. Failures never
//! escape [`StepSequencer::run`]; every step and sub-field is tagged with an
//! [`Outcome`] and the [`PlanReport`] decides whether the plan continued.

pub mod errors;
pub mod executor;
pub mod types;

pub use errors::FlowError;
pub use executor::StepSequencer;
pub use types::{
    AutomationPlan, FieldReport, FieldStep, FlowTiming, Outcome, PlanReport, StepReport,
};
