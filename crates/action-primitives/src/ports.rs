use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ActionError;
use crate::types::{DomEvent, ValueAssignment};

/// Host page contract consumed by the automation core.
///
/// Lookups reflect the live document: an element added after a failed lookup
/// is found by the next one.
#[async_trait]
pub trait PageDom: Send + Sync {
    /// Handle to a located element. Handles may go stale after a re-render.
    type Element: Clone + Debug + Send + Sync;

    /// First element matching `selector`, if any.
    async fn query_selector(&self, selector: &str) -> Result<Option<Self::Element>, ActionError>;

    /// Activate the element with click semantics.
    async fn click(&self, element: &Self::Element) -> Result<(), ActionError>;

    /// Whether the element type's original `value` setter can still be recovered.
    async fn has_native_value_setter(&self, element: &Self::Element) -> Result<bool, ActionError>;

    /// Write `value` into the control through the requested path. Dispatches no events.
    async fn assign_value(
        &self,
        element: &Self::Element,
        value: &str,
        via: ValueAssignment,
    ) -> Result<(), ActionError>;

    async fn dispatch_event(
        &self,
        element: &Self::Element,
        event: &DomEvent,
    ) -> Result<(), ActionError>;

    async fn value(&self, element: &Self::Element) -> Result<String, ActionError>;

    async fn text_content(&self, element: &Self::Element) -> Result<String, ActionError>;

    async fn inner_html(&self, element: &Self::Element) -> Result<String, ActionError>;

    async fn set_text_content(
        &self,
        element: &Self::Element,
        text: &str,
    ) -> Result<(), ActionError>;

    async fn is_checked(&self, element: &Self::Element) -> Result<bool, ActionError>;

    /// Path component of the current location, used for route guarding.
    async fn current_path(&self) -> Result<String, ActionError>;
}
