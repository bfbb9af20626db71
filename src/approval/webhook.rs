use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use consign_core_types::{EntityId, SellerRecord};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::ApprovalError;

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WebhookConfig {
    /// Publishing reports the captured consignor here; unset disables delivery
    pub url: Option<String>,
    pub timeout_ms: Option<u64>,
}

impl WebhookConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.unwrap_or(10_000))
    }
}

/// Consignor details captured before they are replaced on the listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebhookPayload {
    pub delivery_id: Uuid,
    pub listing_id: EntityId,
    pub seller: SellerRecord,
    pub resale_price: String,
    pub payout: String,
    pub captured_at: DateTime<Utc>,
}

impl WebhookPayload {
    pub fn new(listing_id: EntityId, seller: SellerRecord, resale_price: String, payout: String) -> Self {
        Self {
            delivery_id: Uuid::new_v4(),
            listing_id,
            seller,
            resale_price,
            payout,
            captured_at: Utc::now(),
        }
    }
}

#[async_trait]
pub trait PayloadSink: Send + Sync {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), ApprovalError>;
}

/// Posts payloads as JSON.
#[derive(Clone, Debug)]
pub struct WebhookSink {
    client: Client,
    url: String,
}

impl WebhookSink {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, ApprovalError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ApprovalError::Webhook(err.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    pub fn from_config(config: &WebhookConfig) -> Result<Option<Self>, ApprovalError> {
        config
            .url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .map(|url| Self::new(url.trim(), config.timeout()))
            .transpose()
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PayloadSink for WebhookSink {
    async fn deliver(&self, payload: &WebhookPayload) -> Result<(), ApprovalError> {
        debug!(url = %self.url, delivery = %payload.delivery_id, "Posting webhook");
        let response = self
            .client
            .post(&self.url)
            .header("Idempotency-Key", payload.delivery_id.to_string())
            .json(payload)
            .send()
            .await
            .map_err(|err| ApprovalError::Webhook(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApprovalError::Webhook(format!("endpoint answered {status}")));
        }
        info!(listing = %payload.listing_id, %status, "Webhook delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serialises_camel_case() {
        let seller = SellerRecord {
            email: Some("a@b.com".into()),
            ..SellerRecord::default()
        };
        let payload = WebhookPayload::new(
            EntityId::parse("L1").unwrap(),
            seller,
            "100.00".into(),
            "70.00".into(),
        );

        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["listingId"], "L1");
        assert_eq!(json["seller"]["email"], "a@b.com");
        assert_eq!(json["resalePrice"], "100.00");
        assert!(json["deliveryId"].is_string());
        assert!(json["capturedAt"].is_string());
    }

    #[test]
    fn blank_url_disables_delivery() {
        let config = WebhookConfig {
            url: Some("  ".into()),
            timeout_ms: None,
        };
        assert!(WebhookSink::from_config(&config).unwrap().is_none());
        assert!(WebhookSink::from_config(&WebhookConfig::default())
            .unwrap()
            .is_none());
    }
}
