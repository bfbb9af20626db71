use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CdpConfig {
    /// Attach to an already running browser instead of launching one
    pub websocket_url: Option<String>,
    /// Chromium binary; detected from the usual install locations when unset
    pub executable: Option<PathBuf>,
    pub user_data_dir: Option<PathBuf>,
    pub headless: bool,
    pub request_timeout_ms: u64,
    /// Tab to drive: the first open page whose URL contains this, else a new page on it
    pub start_url: String,
    /// Watched requests kept while waiting for their response body
    pub max_in_flight: usize,
}

impl Default for CdpConfig {
    fn default() -> Self {
        Self {
            websocket_url: None,
            executable: None,
            user_data_dir: None,
            headless: false,
            request_timeout_ms: 30_000,
            start_url: "about:blank".to_string(),
            max_in_flight: 256,
        }
    }
}

impl CdpConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_yaml_keeps_defaults() {
        let cfg: CdpConfig =
            serde_yaml::from_str("websocket_url: ws://127.0.0.1:9222/devtools/browser/x\n").unwrap();
        assert_eq!(
            cfg.websocket_url.as_deref(),
            Some("ws://127.0.0.1:9222/devtools/browser/x")
        );
        assert_eq!(cfg.request_timeout(), Duration::from_secs(30));
        assert!(!cfg.headless);
        assert_eq!(cfg.max_in_flight, 256);
    }
}
