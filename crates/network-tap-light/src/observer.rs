use std::sync::Arc;

use bytes::Bytes;
use consign_core_types::EntityId;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::RecordCache;
use crate::config::ObserverConfig;
use crate::extract::{extract_from_body, ExtractError};

/// Result of inspecting one response body
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ObservationOutcome {
    /// A record was stored under `entity`
    Cached { entity: EntityId, replaced: bool },
    /// Not a matching URL, or the payload carried no seller data
    Ignored,
    /// Seller data was seen but could not be used
    Dropped { reason: String },
}

/// Published after every inspected response
#[derive(Clone, Debug)]
pub struct ObservationEvent {
    pub url: String,
    pub outcome: ObservationOutcome,
}

/// Inspects response bodies and upserts extracted seller records into the cache.
pub struct NetworkObserver {
    config: ObserverConfig,
    cache: RecordCache,
    bus: broadcast::Sender<ObservationEvent>,
}

impl NetworkObserver {
    pub fn new(config: ObserverConfig, cache: RecordCache) -> Self {
        let (bus, _) = broadcast::channel(config.event_buffer.max(1));
        Self { config, cache, bus }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ObservationEvent> {
        self.bus.subscribe()
    }

    pub fn matches(&self, url: &str) -> bool {
        !self.config.path_filter.is_empty() && url.contains(&self.config.path_filter)
    }

    /// Inspect one body. Failures are logged and reported, never propagated.
    pub fn observe(&self, url: &str, body: &[u8]) -> ObservationOutcome {
        let outcome = if !self.matches(url) {
            ObservationOutcome::Ignored
        } else {
            match extract_from_body(body, &self.config.identifier_fields) {
                Ok(Some((entity, record))) => {
                    let replaced = self.cache.upsert(entity.clone(), record).is_some();
                    info!(url, %entity, replaced, "Cached seller record");
                    ObservationOutcome::Cached { entity, replaced }
                }
                Ok(None) => {
                    debug!(url, "Response carried no seller data");
                    ObservationOutcome::Ignored
                }
                Err(err @ ExtractError::MissingIdentifier { .. }) => {
                    warn!(url, error = %err, "Dropping seller data without identifier");
                    ObservationOutcome::Dropped {
                        reason: err.to_string(),
                    }
                }
                Err(err @ ExtractError::ParseFailure(_)) => {
                    warn!(url, error = %err, "Could not parse observed response");
                    ObservationOutcome::Dropped {
                        reason: err.to_string(),
                    }
                }
            }
        };

        let _ = self.bus.send(ObservationEvent {
            url: url.to_string(),
            outcome: outcome.clone(),
        });
        outcome
    }

    /// Inspect a body on a detached task.
    pub fn spawn_observe(self: &Arc<Self>, url: String, body: Bytes) -> JoinHandle<ObservationOutcome> {
        let observer = Arc::clone(self);
        tokio::spawn(async move { observer.observe(&url, &body) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_matching_url_leaves_cache_untouched() {
        let observer = NetworkObserver::new(ObserverConfig::default(), RecordCache::new());
        let body = br#"{"data":{"history":{"listings":[{"id":"L1","seller_info":{"seller_email":"a@b.com"}}]}}}"#;

        let outcome = observer.observe("https://api.example.com/v1/listings", body);

        assert_eq!(outcome, ObservationOutcome::Ignored);
        assert!(observer.cache().is_empty());
    }

    #[test]
    fn parse_failure_is_dropped_not_raised() {
        let observer = NetworkObserver::new(ObserverConfig::default(), RecordCache::new());
        let outcome = observer.observe("https://api.example.com/core", b"not json");
        assert!(matches!(outcome, ObservationOutcome::Dropped { .. }));
        assert!(observer.cache().is_empty());
    }

    #[test]
    fn empty_filter_matches_nothing() {
        let config = ObserverConfig {
            path_filter: String::new(),
            ..ObserverConfig::default()
        };
        let observer = NetworkObserver::new(config, RecordCache::new());
        assert!(!observer.matches("https://api.example.com/core"));
    }
}
