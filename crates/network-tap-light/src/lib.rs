//! Passive network observation.
//!
//! [`ObservedFetch`] wraps a [`Fetch`] capability without changing what callers see;
//! matching response bodies are inspected off the caller's path and any seller
//! record found in them is upserted into the shared [`RecordCache`].

pub mod cache;
pub mod config;
pub mod extract;
pub mod fetch;
pub mod http;
pub mod observer;

pub use cache::RecordCache;
pub use config::ObserverConfig;
pub use extract::{extract_from_body, extract_seller_record, ExtractError};
pub use fetch::{Fetch, FetchError, FetchRequest, FetchResponse, ObservedFetch};
pub use http::HttpFetch;
pub use observer::{NetworkObserver, ObservationEvent, ObservationOutcome};
