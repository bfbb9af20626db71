//! Fetch capability and its observing decorator.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;
use tracing::trace;

use crate::observer::NetworkObserver;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("transport error: {0}")]
    Transport(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Bytes>,
}

impl FetchRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".to_string(),
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// Response with a cheaply cloneable body, so an observer can read it without
/// consuming the caller's copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchResponse {
    pub url: String,
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: Bytes,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An outbound HTTP capability
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

#[async_trait]
impl<F> Fetch for Arc<F>
where
    F: Fetch + ?Sized,
{
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        (**self).fetch(request).await
    }
}

/// Decorator that performs every request through the wrapped capability unchanged
/// and hands matching responses to a [`NetworkObserver`] on a detached task.
///
/// The inner capability is owned privately; callers only ever see this wrapper.
pub struct ObservedFetch<F> {
    inner: F,
    observer: Arc<NetworkObserver>,
}

impl<F> ObservedFetch<F>
where
    F: Fetch,
{
    pub fn new(inner: F, observer: Arc<NetworkObserver>) -> Self {
        Self { inner, observer }
    }

    pub fn observer(&self) -> &Arc<NetworkObserver> {
        &self.observer
    }
}

#[async_trait]
impl<F> Fetch for ObservedFetch<F>
where
    F: Fetch,
{
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let observe = self.observer.matches(&request.url);
        let request_url = request.url.clone();

        let response = self.inner.fetch(request).await?;

        if observe {
            trace!(url = %request_url, status = response.status, "Observing matching response");
            // inspection must never delay delivery to the caller
            let _inspection = self
                .observer
                .spawn_observe(request_url, response.body.clone());
        }
        Ok(response)
    }
}
