//! Chromium host for the automation core.
//!
//! [`BrowserSession`] attaches to (or launches) Chromium, [`CdpPage`] implements
//! [`action_primitives::PageDom`] over `Runtime.evaluate`, and [`ResponseTap`]
//! forwards matching response bodies to a [`network_tap_light::NetworkObserver`].

mod browser;
pub mod config;
pub mod errors;
mod in_flight;
mod page;
pub mod script;
mod tap;

pub use browser::BrowserSession;
pub use config::CdpConfig;
pub use errors::{AdapterError, AdapterErrorKind};
pub use page::{CdpElement, CdpPage};
pub use tap::{ResponseTap, TapHandle};
