use std::sync::Arc;
use std::time::Duration;

use action_primitives::{ActionError, PageDom};
use consign_core_types::EntityId;
use network_tap_light::RecordCache;
use perceiver_structural::EntityResolver;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::bindings::{default_bindings, render, DisplayBinding};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    pub interval_ms: u64,
    pub bindings: Vec<DisplayBinding>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            interval_ms: 200,
            bindings: default_bindings(),
        }
    }
}

impl ReconcileConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms.max(1))
    }
}

/// What a single reconciliation pass did
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// No listing identifier on screen
    NoEntity,
    /// Listing on screen, but nothing observed for it yet
    NotCached(EntityId),
    Synced { entity: EntityId, writes: usize },
}

pub struct Reconciler<P> {
    page: Arc<P>,
    resolver: EntityResolver,
    cache: RecordCache,
    config: ReconcileConfig,
}

impl<P> Reconciler<P>
where
    P: PageDom + 'static,
{
    pub fn new(
        page: Arc<P>,
        resolver: EntityResolver,
        cache: RecordCache,
        config: ReconcileConfig,
    ) -> Self {
        Self {
            page,
            resolver,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &ReconcileConfig {
        &self.config
    }

    /// One pass: resolve, look up, and write only the nodes whose text differs.
    ///
    /// Failures on individual nodes are logged and skipped; only a failed
    /// resolution is returned as an error.
    pub async fn tick(&self) -> Result<TickOutcome, ActionError> {
        let Some(entity) = self.resolver.resolve(self.page.as_ref()).await? else {
            return Ok(TickOutcome::NoEntity);
        };
        let Some(record) = self.cache.get(&entity) else {
            return Ok(TickOutcome::NotCached(entity));
        };

        let mut writes = 0;
        for binding in &self.config.bindings {
            let Some(expected) = render(binding.field, &record) else {
                continue;
            };
            match self.sync_node(binding, &expected).await {
                Ok(true) => writes += 1,
                Ok(false) => {}
                Err(err) => {
                    warn!(selector = %binding.selector, error = %err, "Display node sync failed");
                }
            }
        }

        if writes > 0 {
            info!(%entity, writes, "Synced seller details on screen");
        }
        Ok(TickOutcome::Synced { entity, writes })
    }

    async fn sync_node(&self, binding: &DisplayBinding, expected: &str) -> Result<bool, ActionError> {
        let Some(node) = self.page.query_selector(&binding.selector).await? else {
            return Ok(false);
        };
        if self.page.text_content(&node).await? == expected {
            return Ok(false);
        }
        self.page.set_text_content(&node, expected).await?;
        Ok(true)
    }

    /// Run [`tick`](Self::tick) on the configured interval until the handle is shut down.
    pub fn spawn(self: Arc<Self>) -> ReconcileHandle {
        let cancel = CancellationToken::new();
        let loop_token = cancel.clone();
        let period = self.config.interval();
        let task = tokio::spawn(async move {
            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = loop_token.cancelled() => {
                        debug!("Reconciliation loop stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        if let Err(err) = self.tick().await {
                            warn!(error = %err, "Reconciliation tick failed");
                        }
                    }
                }
            }
        });
        ReconcileHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// Stops the reconciliation loop. Dropping it cancels the loop as well.
pub struct ReconcileHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl ReconcileHandle {
    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Gracefully stop the loop and await its completion.
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

impl Drop for ReconcileHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
