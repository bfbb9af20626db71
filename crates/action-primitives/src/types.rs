//! Core data types for action primitives

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Polling parameters for [`crate::ElementWaiter`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaitConfig {
    /// Delay between two consecutive lookups (milliseconds)
    pub poll_interval_ms: u64,

    /// Total budget before giving up (milliseconds)
    pub timeout_ms: u64,
}

impl Default for WaitConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 300,
            timeout_ms: 15_000,
        }
    }
}

impl WaitConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(1))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// How a value reached the control
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueAssignment {
    /// The element type's original, unintercepted setter was invoked directly
    NativeSetter,
    /// The setter could not be recovered; the property was assigned on the element
    PropertyFallback,
}

/// Synthetic DOM events dispatched on behalf of a user
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DomEvent {
    Input {
        bubbles: bool,
    },
    KeyDown {
        key: String,
        code: String,
        key_code: u32,
        which: u32,
        bubbles: bool,
        cancelable: bool,
    },
}

impl DomEvent {
    /// Bubbling `input` event so delegated listeners on ancestors fire.
    pub fn input() -> Self {
        DomEvent::Input { bubbles: true }
    }

    /// Bubbling, cancelable Enter key-down.
    pub fn enter_key_down() -> Self {
        DomEvent::KeyDown {
            key: "Enter".to_string(),
            code: "Enter".to_string(),
            key_code: 13,
            which: 13,
            bubbles: true,
            cancelable: true,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomEvent::Input { .. } => "input",
            DomEvent::KeyDown { .. } => "keydown",
        }
    }

    pub fn bubbles(&self) -> bool {
        match self {
            DomEvent::Input { bubbles } | DomEvent::KeyDown { bubbles, .. } => *bubbles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_wait_config() {
        let config = WaitConfig::default();
        assert_eq!(config.poll_interval_ms, 300);
        assert_eq!(config.timeout_ms, 15_000);
    }

    #[test]
    fn test_enter_key_fields() {
        match DomEvent::enter_key_down() {
            DomEvent::KeyDown {
                key,
                code,
                key_code,
                which,
                bubbles,
                cancelable,
            } => {
                assert_eq!(key, "Enter");
                assert_eq!(code, "Enter");
                assert_eq!((key_code, which), (13, 13));
                assert!(bubbles && cancelable);
            }
            other => panic!("unexpected event {other:?}"),
        }
    }
}
