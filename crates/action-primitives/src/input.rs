//! Controlled-input writes

use tracing::debug;

use crate::{
    errors::ActionError,
    ports::PageDom,
    types::{DomEvent, ValueAssignment},
};

/// Set a framework-controlled input so the framework sees the change as typed.
///
/// Frameworks that intercept the instance `value` setter ignore plain property
/// writes, so the element type's original setter is invoked when the host can
/// still recover it. Exactly one bubbling `input` event follows.
pub async fn set_controlled_value<P>(
    page: &P,
    element: &P::Element,
    value: &str,
) -> Result<ValueAssignment, ActionError>
where
    P: PageDom + ?Sized,
{
    let via = if page.has_native_value_setter(element).await? {
        ValueAssignment::NativeSetter
    } else {
        ValueAssignment::PropertyFallback
    };

    page.assign_value(element, value, via).await?;
    page.dispatch_event(element, &DomEvent::input()).await?;

    debug!(?element, ?via, value_len = value.len(), "Controlled value set");
    Ok(via)
}

/// Commit a value for controls that only accept it on Enter.
pub async fn press_enter<P>(page: &P, element: &P::Element) -> Result<(), ActionError>
where
    P: PageDom + ?Sized,
{
    page.dispatch_event(element, &DomEvent::enter_key_down())
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::{MemoryNode, MemoryPage};

    #[tokio::test]
    async fn test_value_set_with_single_bubbling_input_event() {
        let page = MemoryPage::new();
        page.mount("input[name=seller_email]", MemoryNode::input());
        let element = page
            .query_selector("input[name=seller_email]")
            .await
            .unwrap()
            .unwrap();

        let via = set_controlled_value(&page, &element, "dvf@trove.co")
            .await
            .unwrap();

        let node = page.snapshot("input[name=seller_email]").unwrap();
        assert_eq!(via, ValueAssignment::NativeSetter);
        assert_eq!(node.value, "dvf@trove.co");
        assert_eq!(node.events, vec![DomEvent::input()]);
        assert!(node.events[0].bubbles());
    }

    #[tokio::test]
    async fn test_falls_back_to_property_assignment() {
        let page = MemoryPage::new();
        page.mount("#legacy", MemoryNode::input().without_native_setter());
        let element = page.query_selector("#legacy").await.unwrap().unwrap();

        let via = set_controlled_value(&page, &element, "10014").await.unwrap();

        let node = page.snapshot("#legacy").unwrap();
        assert_eq!(via, ValueAssignment::PropertyFallback);
        assert_eq!(node.value, "10014");
        assert_eq!(node.assignments, vec![ValueAssignment::PropertyFallback]);
        assert_eq!(node.events.len(), 1);
    }

    #[tokio::test]
    async fn test_press_enter_dispatches_keydown() {
        let page = MemoryPage::new();
        page.mount("#field", MemoryNode::input());
        let element = page.query_selector("#field").await.unwrap().unwrap();

        press_enter(&page, &element).await.unwrap();

        let node = page.snapshot("#field").unwrap();
        assert_eq!(node.events, vec![DomEvent::enter_key_down()]);
    }

    #[tokio::test]
    async fn test_detached_element_reports_error() {
        let page = MemoryPage::new();
        page.mount("#gone", MemoryNode::input());
        let element = page.query_selector("#gone").await.unwrap().unwrap();
        page.unmount("#gone");

        let err = set_controlled_value(&page, &element, "x").await.unwrap_err();
        assert!(matches!(err, ActionError::Detached(_)));
    }
}
