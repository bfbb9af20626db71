use async_trait::async_trait;
use chromiumoxide::Page;
use serde_json::Value;
use tracing::trace;

use action_primitives::{ActionError, DomEvent, PageDom, ValueAssignment};

use crate::errors::host_io;
use crate::script;

/// Element handle: the selector it was located by, re-resolved on every use.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CdpElement {
    selector: String,
}

impl CdpElement {
    pub fn selector(&self) -> &str {
        &self.selector
    }
}

/// [`PageDom`] over a live Chromium tab.
#[derive(Clone, Debug)]
pub struct CdpPage {
    page: Page,
}

impl CdpPage {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    pub fn inner(&self) -> &Page {
        &self.page
    }

    async fn eval(&self, expression: String) -> Result<Value, ActionError> {
        trace!(expression = %expression, "Evaluating in page");
        let result = self.page.evaluate(expression).await.map_err(host_io)?;
        Ok(result.into_value::<Value>().unwrap_or(Value::Null))
    }

    /// Evaluate an element script, mapping the `null` "element gone" answer to [`ActionError::Detached`].
    async fn eval_on(&self, element: &CdpElement, expression: String) -> Result<Value, ActionError> {
        match self.eval(expression).await? {
            Value::Null => Err(ActionError::Detached(element.selector.clone())),
            value => Ok(value),
        }
    }

    async fn read_string(&self, element: &CdpElement, property: &str) -> Result<String, ActionError> {
        match self.eval_on(element, script::read(&element.selector, property)).await? {
            Value::String(text) => Ok(text),
            other => Err(ActionError::Script(format!(
                "expected string {property}, got {other}"
            ))),
        }
    }
}

#[async_trait]
impl PageDom for CdpPage {
    type Element = CdpElement;

    async fn query_selector(&self, selector: &str) -> Result<Option<CdpElement>, ActionError> {
        let found = self.eval(script::exists(selector)).await?;
        Ok(found.as_bool().unwrap_or(false).then(|| CdpElement {
            selector: selector.to_string(),
        }))
    }

    async fn click(&self, element: &CdpElement) -> Result<(), ActionError> {
        self.eval_on(element, script::click(&element.selector))
            .await
            .map(|_| ())
    }

    async fn has_native_value_setter(&self, element: &CdpElement) -> Result<bool, ActionError> {
        let value = self
            .eval_on(element, script::has_native_value_setter(&element.selector))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn assign_value(
        &self,
        element: &CdpElement,
        value: &str,
        via: ValueAssignment,
    ) -> Result<(), ActionError> {
        self.eval_on(element, script::assign_value(&element.selector, value, via))
            .await
            .map(|_| ())
    }

    async fn dispatch_event(&self, element: &CdpElement, event: &DomEvent) -> Result<(), ActionError> {
        self.eval_on(element, script::dispatch(&element.selector, event))
            .await
            .map(|_| ())
    }

    async fn value(&self, element: &CdpElement) -> Result<String, ActionError> {
        self.read_string(element, "value").await
    }

    async fn text_content(&self, element: &CdpElement) -> Result<String, ActionError> {
        self.read_string(element, "textContent").await
    }

    async fn inner_html(&self, element: &CdpElement) -> Result<String, ActionError> {
        self.read_string(element, "innerHTML").await
    }

    async fn set_text_content(&self, element: &CdpElement, text: &str) -> Result<(), ActionError> {
        self.eval_on(element, script::set_text(&element.selector, text))
            .await
            .map(|_| ())
    }

    async fn is_checked(&self, element: &CdpElement) -> Result<bool, ActionError> {
        let value = self
            .eval_on(element, script::checked(&element.selector))
            .await?;
        Ok(value.as_bool().unwrap_or(false))
    }

    async fn current_path(&self) -> Result<String, ActionError> {
        match self.eval(script::CURRENT_PATH.to_string()).await? {
            Value::String(path) => Ok(path),
            other => Err(ActionError::Script(format!("unexpected pathname {other}"))),
        }
    }
}
