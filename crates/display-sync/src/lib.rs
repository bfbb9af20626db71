//! Keeps seller details on screen in line with what the network tap has cached.

pub mod bindings;
pub mod reconciler;

pub use bindings::{default_bindings, render, DisplayBinding, DisplayField};
pub use reconciler::{ReconcileConfig, ReconcileHandle, Reconciler, TickOutcome};
