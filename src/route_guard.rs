//! Starts and stops page-bound loops as the host page navigates.

use std::sync::Arc;
use std::time::Duration;

use action_primitives::{ActionError, PageDom};
use display_sync::{ReconcileHandle, Reconciler};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouteConfig {
    /// Path fragment identifying a listing page
    pub listing_path: String,
    pub poll_interval_ms: u64,
}

impl Default for RouteConfig {
    fn default() -> Self {
        Self {
            listing_path: "/listings/".to_string(),
            poll_interval_ms: 500,
        }
    }
}

impl RouteConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }
}

#[derive(Clone, Debug, Default)]
pub struct RouteGuard {
    config: RouteConfig,
}

impl RouteGuard {
    pub fn new(config: RouteConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RouteConfig {
        &self.config
    }

    pub fn is_listing(&self, path: &str) -> bool {
        path.contains(&self.config.listing_path)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RouteTransition {
    Entered,
    Left,
    Unchanged,
}

/// Runs the reconciliation loop only while a listing page is open.
pub struct ListingSession<P> {
    page: Arc<P>,
    guard: RouteGuard,
    reconciler: Arc<Reconciler<P>>,
    handle: Option<ReconcileHandle>,
}

impl<P> ListingSession<P>
where
    P: PageDom + 'static,
{
    pub fn new(page: Arc<P>, guard: RouteGuard, reconciler: Reconciler<P>) -> Self {
        Self {
            page,
            guard,
            reconciler: Arc::new(reconciler),
            handle: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.is_some()
    }

    /// Set up on entering a listing page, tear down on leaving. Repeated calls are no-ops.
    pub async fn on_route(&mut self, path: &str) -> RouteTransition {
        match (self.guard.is_listing(path), self.handle.is_some()) {
            (true, false) => {
                info!(path, "Listing page opened, starting reconciliation");
                self.handle = Some(Arc::clone(&self.reconciler).spawn());
                RouteTransition::Entered
            }
            (false, true) => {
                info!(path, "Left listing page, stopping reconciliation");
                self.teardown().await;
                RouteTransition::Left
            }
            _ => RouteTransition::Unchanged,
        }
    }

    /// Read the page's current path and react to it.
    pub async fn sync(&mut self) -> Result<RouteTransition, ActionError> {
        let path = self.page.current_path().await?;
        Ok(self.on_route(&path).await)
    }

    pub async fn teardown(&mut self) {
        if let Some(handle) = self.handle.take() {
            if let Err(err) = handle.shutdown().await {
                warn!(error = %err, "Reconciliation loop ended abnormally");
            }
        }
    }
}
