use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use network_tap_light::RecordCache;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Lets exactly one automation-synthesized click through the click interceptor.
#[derive(Clone, Debug, Default)]
pub struct ReentrancyGuard {
    armed: Arc<AtomicBool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call right before clicking the original control on the operator's behalf.
    pub fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// Consume the armed state. True at most once per [`arm`](Self::arm).
    pub fn take(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }

    pub fn is_armed(&self) -> bool {
        self.armed.load(Ordering::SeqCst)
    }
}

/// State shared by everything running against one page.
#[derive(Debug, Default)]
pub struct AutomationContext {
    cache: RecordCache,
    guard: ReentrancyGuard,
    cancel: CancellationToken,
}

impl AutomationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: RecordCache) -> Self {
        Self {
            cache,
            ..Self::default()
        }
    }

    pub fn cache(&self) -> &RecordCache {
        &self.cache
    }

    pub fn guard(&self) -> &ReentrancyGuard {
        &self.guard
    }

    /// Token cancelled by [`teardown`](Self::teardown).
    pub fn child_token(&self) -> CancellationToken {
        self.cancel.child_token()
    }

    pub fn teardown(&self) {
        debug!("Tearing down automation context");
        self.cancel.cancel();
    }

    pub fn is_torn_down(&self) -> bool {
        self.cancel.is_cancelled()
    }
}
