//! Effective configuration: one section per component, every field defaulted.

use action_flow::{AutomationPlan, FlowTiming};
use cdp_adapter::CdpConfig;
use display_sync::ReconcileConfig;
use network_tap_light::ObserverConfig;
use perceiver_structural::EntityResolverConfig;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::approval::{ApprovalConfig, WebhookConfig};
use crate::plan::replacement_plan;
use crate::route_guard::RouteConfig;

pub const WEBHOOK_URL_ENV: &str = "CONSIGN_WEBHOOK_URL";
pub const BROWSER_WS_ENV: &str = "CONSIGN_BROWSER_WS";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub browser: CdpConfig,
    pub observer: ObserverConfig,
    pub resolver: EntityResolverConfig,
    pub reconcile: ReconcileConfig,
    pub route: RouteConfig,
    pub timing: FlowTiming,
    pub approval: ApprovalConfig,
    pub webhook: WebhookConfig,
    /// Steps replacing the consignor's details before publishing
    pub plan: AutomationPlan,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser: CdpConfig::default(),
            observer: ObserverConfig::default(),
            resolver: EntityResolverConfig::default(),
            reconcile: ReconcileConfig::default(),
            route: RouteConfig::default(),
            timing: FlowTiming::default(),
            approval: ApprovalConfig::default(),
            webhook: WebhookConfig::default(),
            plan: replacement_plan(),
        }
    }
}

impl Config {
    /// Apply overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Webhook URL taken from {}", WEBHOOK_URL_ENV);
            self.webhook.url = Some(url);
        }
        if let Some(ws) = lookup(BROWSER_WS_ENV).filter(|v| !v.trim().is_empty()) {
            info!("Browser endpoint taken from {}", BROWSER_WS_ENV);
            self.browser.websocket_url = Some(ws);
        }
    }

    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_mirror_dashboard_constants() {
        let config = Config::default();
        assert_eq!(config.observer.path_filter, "/core");
        assert_eq!(config.timing.wait.poll_interval_ms, 300);
        assert_eq!(config.timing.wait.timeout_ms, 15_000);
        assert_eq!(config.timing.after_reveal_pause_ms, 150);
        assert_eq!(config.reconcile.interval_ms, 200);
        assert_eq!(config.route.listing_path, "/listings/");
        assert_eq!(config.plan.len(), 4);
        assert!(config.webhook.url.is_none());
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = Config::default();
        config.webhook.url = Some("https://old.example.com/hook".into());
        let env: HashMap<&str, &str> = [
            (WEBHOOK_URL_ENV, "https://hooks.example.com/consign"),
            (BROWSER_WS_ENV, "  "),
        ]
        .into_iter()
        .collect();

        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(
            config.webhook.url.as_deref(),
            Some("https://hooks.example.com/consign")
        );
        assert!(config.browser.websocket_url.is_none());
    }

    #[test]
    fn yaml_round_trip_keeps_plan() {
        let yaml = serde_yaml::to_string(&Config::default()).unwrap();
        let parsed: Config = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
