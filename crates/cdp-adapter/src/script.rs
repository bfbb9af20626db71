//! `Runtime.evaluate` expressions backing [`CdpPage`](crate::CdpPage).
//!
//! Every element operation re-queries its selector, so a handle never outlives a
//! re-render silently: a missing element evaluates to `null` and surfaces as detached.

use action_primitives::{DomEvent, ValueAssignment};
use serde_json::{json, Value};

/// Quote `raw` as a JavaScript string literal.
pub fn literal(raw: &str) -> String {
    Value::String(raw.to_string()).to_string()
}

fn with_element(selector: &str, body: &str) -> String {
    format!(
        "(() => {{ const el = document.querySelector({sel}); if (!el) return null; {body} }})()",
        sel = literal(selector)
    )
}

pub fn exists(selector: &str) -> String {
    format!("document.querySelector({}) !== null", literal(selector))
}

pub fn click(selector: &str) -> String {
    with_element(selector, "el.click(); return true;")
}

pub fn has_native_value_setter(selector: &str) -> String {
    with_element(
        selector,
        "const desc = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
         return !!(desc && typeof desc.set === 'function');",
    )
}

pub fn assign_value(selector: &str, value: &str, via: ValueAssignment) -> String {
    let value = literal(value);
    let body = match via {
        ValueAssignment::NativeSetter => format!(
            "const desc = Object.getOwnPropertyDescriptor(Object.getPrototypeOf(el), 'value'); \
             desc.set.call(el, {value}); return true;"
        ),
        ValueAssignment::PropertyFallback => format!("el.value = {value}; return true;"),
    };
    with_element(selector, &body)
}

fn event_constructor(event: &DomEvent) -> String {
    match event {
        DomEvent::Input { bubbles } => {
            format!("new Event('input', {})", json!({ "bubbles": bubbles }))
        }
        DomEvent::KeyDown {
            key,
            code,
            key_code,
            which,
            bubbles,
            cancelable,
        } => format!(
            "new KeyboardEvent('keydown', {})",
            json!({
                "key": key,
                "code": code,
                "keyCode": key_code,
                "which": which,
                "bubbles": bubbles,
                "cancelable": cancelable,
            })
        ),
    }
}

pub fn dispatch(selector: &str, event: &DomEvent) -> String {
    with_element(
        selector,
        &format!("el.dispatchEvent({}); return true;", event_constructor(event)),
    )
}

/// Read a string property (`value`, `textContent`, `innerHTML`).
pub fn read(selector: &str, property: &str) -> String {
    with_element(selector, &format!("return el[{}] ?? '';", literal(property)))
}

pub fn checked(selector: &str) -> String {
    with_element(selector, "return !!el.checked;")
}

pub fn set_text(selector: &str, text: &str) -> String {
    with_element(
        selector,
        &format!("el.textContent = {}; return true;", literal(text)),
    )
}

pub const CURRENT_PATH: &str = "window.location.pathname";
