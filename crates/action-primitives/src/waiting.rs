//! Built-in waiting for transient elements

use std::time::Duration;
use tokio::time::{sleep, timeout_at, Instant};
use tracing::{debug, warn};

use crate::{errors::ActionError, ports::PageDom, types::WaitConfig};

/// Polls the page for a selector at a fixed interval until found or out of budget.
#[derive(Clone, Copy, Debug, Default)]
pub struct ElementWaiter {
    config: WaitConfig,
}

impl ElementWaiter {
    pub fn new(config: WaitConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> WaitConfig {
        self.config
    }

    /// Resolve to the first matching element, or fail with [`ActionError::NotFound`]
    /// no earlier than the timeout and no later than timeout + one poll interval.
    ///
    /// Host errors during a lookup are treated as "not there yet".
    pub async fn wait_for<P>(&self, page: &P, selector: &str) -> Result<P::Element, ActionError>
    where
        P: PageDom + ?Sized,
    {
        let started = Instant::now();
        let timeout = self.config.timeout();
        let poll = self.config.poll_interval();
        // a slow host lookup is cut off here rather than stretching the wait
        let hard_deadline = started + timeout + poll;
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            match timeout_at(hard_deadline, page.query_selector(selector)).await {
                Ok(Ok(Some(element))) => {
                    debug!(
                        selector,
                        attempts,
                        elapsed_ms = elapsed_ms(started.elapsed()),
                        "Element located"
                    );
                    return Ok(element);
                }
                Ok(Ok(None)) => {}
                Ok(Err(err)) => {
                    warn!(selector, attempts, error = %err, "Lookup failed; polling again");
                }
                Err(_) => {
                    warn!(selector, attempts, "Lookup outlived the wait budget");
                    return Err(not_found(selector, started));
                }
            }

            let elapsed = started.elapsed();
            if elapsed >= timeout {
                return Err(not_found(selector, started));
            }
            // the last lookup lands on the deadline itself
            sleep(poll.min(timeout - elapsed)).await;
        }
    }
}

fn not_found(selector: &str, started: Instant) -> ActionError {
    ActionError::NotFound {
        selector: selector.to_string(),
        elapsed_ms: elapsed_ms(started.elapsed()),
    }
}

fn elapsed_ms(elapsed: Duration) -> u64 {
    elapsed.as_millis() as u64
}
