use std::sync::Arc;

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use bytes::Bytes;
use chromiumoxide::cdp::browser_protocol::network::{
    EnableParams, EventLoadingFailed, EventLoadingFinished, EventRequestWillBeSent,
    GetResponseBodyParams, RequestId,
};
use chromiumoxide::cdp::browser_protocol::page::EventFrameNavigated;
use chromiumoxide::Page;
use futures::StreamExt;
use network_tap_light::NetworkObserver;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::errors::{AdapterError, AdapterErrorKind};
use crate::in_flight::InFlightRequests;
use crate::page::CdpPage;

const DEFAULT_IN_FLIGHT: usize = 256;

/// Feeds response bodies of matching requests on a tab to a [`NetworkObserver`].
///
/// Bodies are read through `Network.getResponseBody` once loading finishes, so the
/// page's own request flow is never touched.
pub struct ResponseTap {
    observer: Arc<NetworkObserver>,
    capacity: usize,
}

impl ResponseTap {
    pub fn new(observer: Arc<NetworkObserver>) -> Self {
        Self {
            observer,
            capacity: DEFAULT_IN_FLIGHT,
        }
    }

    /// Cap on watched requests awaiting their body
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    pub async fn attach(&self, page: &CdpPage) -> Result<TapHandle, AdapterError> {
        let page = page.inner().clone();
        page.execute(EnableParams::default()).await?;

        let mut requests = page.event_listener::<EventRequestWillBeSent>().await?;
        let mut finished = page.event_listener::<EventLoadingFinished>().await?;
        let mut failed = page.event_listener::<EventLoadingFailed>().await?;
        let mut navigations = page.event_listener::<EventFrameNavigated>().await?;

        let cancel = CancellationToken::new();
        let loop_token = cancel.clone();
        let observer = Arc::clone(&self.observer);
        let capacity = self.capacity;

        let task = tokio::spawn(async move {
            let mut in_flight = InFlightRequests::new(capacity);
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => break,
                    event = requests.next() => {
                        let Some(event) = event else { break };
                        if observer.matches(&event.request.url) {
                            in_flight.track(
                                event.request_id.inner(),
                                &event.request.url,
                                event.loader_id.inner(),
                            );
                        }
                    }
                    event = failed.next() => {
                        let Some(event) = event else { break };
                        in_flight.finish(event.request_id.inner());
                    }
                    event = navigations.next() => {
                        let Some(event) = event else { break };
                        if event.frame.parent_id.is_none() {
                            in_flight.navigated(event.frame.loader_id.inner());
                        }
                    }
                    event = finished.next() => {
                        let Some(event) = event else { break };
                        if let Some(url) = in_flight.finish(event.request_id.inner()) {
                            let page = page.clone();
                            let observer = Arc::clone(&observer);
                            let request_id = event.request_id.clone();
                            tokio::spawn(async move {
                                match response_body(&page, request_id).await {
                                    Ok(body) => {
                                        observer.observe(&url, &body);
                                    }
                                    Err(err) => warn!(url = %url, error = %err, "Response body unavailable"),
                                }
                            });
                        }
                    }
                }
            }
            debug!(pending = in_flight.len(), "Response tap stopped");
        });

        Ok(TapHandle {
            cancel,
            task: Some(task),
        })
    }
}

async fn response_body(page: &Page, request_id: RequestId) -> Result<Bytes, AdapterError> {
    let response = page.execute(GetResponseBodyParams::new(request_id)).await?;
    let body = response.result;
    if body.base64_encoded {
        BASE64.decode(body.body).map(Bytes::from).map_err(|err| {
            AdapterError::new(AdapterErrorKind::CdpIo).with_hint(format!("invalid base64 body: {err}"))
        })
    } else {
        Ok(Bytes::from(body.body))
    }
}

/// Stops the tap. Dropping it stops the tap as well.
pub struct TapHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl TapHandle {
    pub async fn shutdown(mut self) -> Result<(), tokio::task::JoinError> {
        self.cancel.cancel();
        match self.task.take() {
            Some(task) => match task.await {
                Ok(()) => Ok(()),
                Err(err) if err.is_cancelled() => Ok(()),
                Err(err) => Err(err),
            },
            None => Ok(()),
        }
    }
}

impl Drop for TapHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
