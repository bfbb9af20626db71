//! Deterministic in-memory page used by tests across the workspace.
//!
//! Selectors are matched literally; the page is a registry of mounted nodes keyed
//! by the selector that finds them. Nodes can appear after a delay or when another
//! node is clicked, which is enough to model reveal-then-fill widgets.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tokio::time::Instant;

use crate::{
    errors::ActionError,
    ports::PageDom,
    types::{DomEvent, ValueAssignment},
};

/// Recorded state of a node in a [`MemoryPage`]
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MemoryNode {
    pub value: String,
    pub text: String,
    pub html: Option<String>,
    pub checked: Option<bool>,
    pub native_setter: bool,
    pub events: Vec<DomEvent>,
    pub assignments: Vec<ValueAssignment>,
    pub clicks: u32,
    pub text_writes: u32,
    /// Returned by every click instead of clicking
    pub click_error: Option<ActionError>,
}

impl MemoryNode {
    pub fn input() -> Self {
        Self {
            native_setter: true,
            ..Self::default()
        }
    }

    pub fn input_with_value(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Self::input()
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn html(html: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            html: Some(html.into()),
            text: text.into(),
            ..Self::default()
        }
    }

    pub fn button() -> Self {
        Self::default()
    }

    pub fn checkbox(checked: bool) -> Self {
        Self {
            checked: Some(checked),
            ..Self::default()
        }
    }

    pub fn without_native_setter(mut self) -> Self {
        self.native_setter = false;
        self
    }

    pub fn failing_clicks(mut self, error: ActionError) -> Self {
        self.click_error = Some(error);
        self
    }
}

/// Handle into a [`MemoryPage`]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MemoryElement {
    id: u64,
    selector: String,
}

impl MemoryElement {
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

struct Reveal {
    selector: String,
    node: MemoryNode,
    delay: Duration,
}

struct Pending {
    selector: String,
    node: MemoryNode,
    at: Instant,
}

#[derive(Default)]
struct PageState {
    nodes: HashMap<u64, MemoryNode>,
    mounted: HashMap<String, u64>,
    pending: Vec<Pending>,
    reveals: HashMap<String, Vec<Reveal>>,
    path: String,
}

impl PageState {
    fn promote_due(&mut self, now: Instant, ids: &AtomicU64) {
        let (due, waiting): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|pending| pending.at <= now);
        self.pending = waiting;
        for pending in due {
            self.insert(pending.selector, pending.node, ids);
        }
    }

    fn insert(&mut self, selector: String, node: MemoryNode, ids: &AtomicU64) {
        let id = ids.fetch_add(1, Ordering::Relaxed);
        if let Some(previous) = self.mounted.insert(selector, id) {
            self.nodes.remove(&previous);
        }
        self.nodes.insert(id, node);
    }

    fn node_mut(&mut self, element: &MemoryElement) -> Result<&mut MemoryNode, ActionError> {
        self.nodes
            .get_mut(&element.id)
            .ok_or_else(|| ActionError::Detached(element.selector.clone()))
    }
}

/// In-memory [`PageDom`] implementation
pub struct MemoryPage {
    state: Mutex<PageState>,
    ids: AtomicU64,
    queries: AtomicU64,
    query_latency: Mutex<Duration>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PageState {
                path: "/".to_string(),
                ..PageState::default()
            }),
            ids: AtomicU64::new(1),
            queries: AtomicU64::new(0),
            query_latency: Mutex::new(Duration::ZERO),
        }
    }

    /// Mount a node immediately, replacing whatever the selector matched before.
    pub fn mount(&self, selector: &str, node: MemoryNode) {
        self.state
            .lock()
            .insert(selector.to_string(), node, &self.ids);
    }

    /// Mount a node once `delay` has elapsed on the runtime clock.
    pub fn mount_after(&self, selector: &str, node: MemoryNode, delay: Duration) {
        self.state.lock().pending.push(Pending {
            selector: selector.to_string(),
            node,
            at: Instant::now() + delay,
        });
    }

    /// When `trigger` is clicked, mount `node` at `selector` after `delay`.
    pub fn reveal_on_click(&self, trigger: &str, selector: &str, node: MemoryNode, delay: Duration) {
        self.state
            .lock()
            .reveals
            .entry(trigger.to_string())
            .or_default()
            .push(Reveal {
                selector: selector.to_string(),
                node,
                delay,
            });
    }

    pub fn unmount(&self, selector: &str) {
        let mut state = self.state.lock();
        if let Some(id) = state.mounted.remove(selector) {
            state.nodes.remove(&id);
        }
    }

    pub fn set_path(&self, path: &str) {
        self.state.lock().path = path.to_string();
    }

    /// Copy of the node currently mounted at `selector`.
    pub fn snapshot(&self, selector: &str) -> Option<MemoryNode> {
        let state = self.state.lock();
        let id = state.mounted.get(selector)?;
        state.nodes.get(id).cloned()
    }

    /// Make every `query_selector` take `latency` on the runtime clock.
    pub fn set_query_latency(&self, latency: Duration) {
        *self.query_latency.lock() = latency;
    }

    /// Number of `query_selector` calls served so far.
    pub fn query_count(&self) -> u64 {
        self.queries.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PageDom for MemoryPage {
    type Element = MemoryElement;

    async fn query_selector(&self, selector: &str) -> Result<Option<MemoryElement>, ActionError> {
        self.queries.fetch_add(1, Ordering::Relaxed);
        let latency = *self.query_latency.lock();
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let mut state = self.state.lock();
        state.promote_due(Instant::now(), &self.ids);
        Ok(state.mounted.get(selector).map(|id| MemoryElement {
            id: *id,
            selector: selector.to_string(),
        }))
    }

    async fn click(&self, element: &MemoryElement) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let node = state.node_mut(element)?;
        if let Some(err) = node.click_error.clone() {
            return Err(err);
        }
        node.clicks += 1;
        if let Some(checked) = node.checked.as_mut() {
            *checked = !*checked;
        }

        let now = Instant::now();
        let reveals: Vec<(String, MemoryNode, Duration)> = state
            .reveals
            .get(&element.selector)
            .map(|reveals| {
                reveals
                    .iter()
                    .map(|reveal| (reveal.selector.clone(), reveal.node.clone(), reveal.delay))
                    .collect()
            })
            .unwrap_or_default();
        for (selector, node, delay) in reveals {
            if delay.is_zero() {
                state.insert(selector, node, &self.ids);
            } else {
                state.pending.push(Pending {
                    selector,
                    node,
                    at: now + delay,
                });
            }
        }
        Ok(())
    }

    async fn has_native_value_setter(&self, element: &MemoryElement) -> Result<bool, ActionError> {
        let mut state = self.state.lock();
        Ok(state.node_mut(element)?.native_setter)
    }

    async fn assign_value(
        &self,
        element: &MemoryElement,
        value: &str,
        via: ValueAssignment,
    ) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let node = state.node_mut(element)?;
        node.value = value.to_string();
        node.assignments.push(via);
        Ok(())
    }

    async fn dispatch_event(
        &self,
        element: &MemoryElement,
        event: &DomEvent,
    ) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        state.node_mut(element)?.events.push(event.clone());
        Ok(())
    }

    async fn value(&self, element: &MemoryElement) -> Result<String, ActionError> {
        let mut state = self.state.lock();
        Ok(state.node_mut(element)?.value.clone())
    }

    async fn text_content(&self, element: &MemoryElement) -> Result<String, ActionError> {
        let mut state = self.state.lock();
        Ok(state.node_mut(element)?.text.clone())
    }

    async fn inner_html(&self, element: &MemoryElement) -> Result<String, ActionError> {
        let mut state = self.state.lock();
        let node = state.node_mut(element)?;
        Ok(node.html.clone().unwrap_or_else(|| node.text.clone()))
    }

    async fn set_text_content(&self, element: &MemoryElement, text: &str) -> Result<(), ActionError> {
        let mut state = self.state.lock();
        let node = state.node_mut(element)?;
        node.text = text.to_string();
        node.html = None;
        node.text_writes += 1;
        Ok(())
    }

    async fn is_checked(&self, element: &MemoryElement) -> Result<bool, ActionError> {
        let mut state = self.state.lock();
        Ok(state.node_mut(element)?.checked.unwrap_or(false))
    }

    async fn current_path(&self) -> Result<String, ActionError> {
        Ok(self.state.lock().path.clone())
    }
}
