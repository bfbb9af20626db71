//! Action primitives for driving a third-party page through a narrow host port.
//!
//! - [`PageDom`]: the contract a host page must satisfy (locate, click, assign, dispatch)
//! - [`ElementWaiter`]: cooperative polling for transient elements
//! - [`set_controlled_value`] / [`press_enter`]: value writes that reactive frameworks observe

pub mod errors;
mod input;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
mod ports;
pub mod types;
mod waiting;

pub use errors::*;
pub use input::*;
pub use ports::*;
pub use types::*;
pub use waiting::*;
