use std::sync::Arc;

use action_flow::{AutomationPlan, PlanReport, StepSequencer};
use action_primitives::{set_controlled_value, ElementWaiter, PageDom};
use consign_core_types::EntityId;
use perceiver_structural::EntityResolver;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::notify::OperatorNotifier;
use super::price::{cents, PricingConfig, ResalePrice};
use super::webhook::{PayloadSink, WebhookPayload};
use crate::context::AutomationContext;
use crate::errors::ApprovalError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalSelectors {
    pub listing_price: String,
    pub shipping_price: String,
    pub save_button: String,
    pub allow_unmatched_checkbox: String,
    /// The page's own approve control
    pub approve_button: String,
    pub address_line1: String,
    pub address_line2: String,
}

impl Default for ApprovalSelectors {
    fn default() -> Self {
        Self {
            listing_price: r#"input[name="listing_price"]"#.to_string(),
            shipping_price: r#"input[name="shipping_price"]"#.to_string(),
            save_button: r#"[data-testid="save-pending-listing-btn"]"#.to_string(),
            allow_unmatched_checkbox:
                r#"div[data-testid="allow-unmatched-checkbox"] input[type="checkbox"]"#.to_string(),
            approve_button: ".fullButton".to_string(),
            address_line1: r#"[data-testid="seller-address-line-1"]"#.to_string(),
            address_line2: r#"[data-testid="seller-address-line-2"]"#.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApprovalConfig {
    pub selectors: ApprovalSelectors,
    pub pricing: PricingConfig,
}

/// What the interceptor did with a click on the approve control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickDecision {
    /// Our own synthesized click; let the page handle it
    PassThrough,
    /// Genuine click, held back for the operator. `checkbox_ticked` is true when
    /// "allow unmatched" had to be ticked.
    Intercepted { checkbox_ticked: bool },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeliveryStatus {
    Disabled,
    Delivered,
    Failed(String),
}

#[derive(Clone, Debug)]
pub struct PublishReport {
    pub listing_id: Option<EntityId>,
    pub price: ResalePrice,
    pub payout: f64,
    pub prices_written: bool,
    pub plan: PlanReport,
    pub delivery: DeliveryStatus,
    pub approve_clicked: bool,
}

#[derive(Clone, Debug)]
pub struct AcceptReport {
    pub price: ResalePrice,
    pub payout: f64,
    pub prices_written: bool,
    pub saved: bool,
    /// Consignor address as shown on the listing, for the shipping label
    pub address: Option<String>,
}

/// Drives the approve and accept actions against one page.
pub struct ApprovalWorkflow<P> {
    page: Arc<P>,
    context: Arc<AutomationContext>,
    config: ApprovalConfig,
    plan: AutomationPlan,
    sequencer: StepSequencer,
    waiter: ElementWaiter,
    resolver: EntityResolver,
    notifier: Arc<dyn OperatorNotifier>,
    sink: Option<Arc<dyn PayloadSink>>,
}

impl<P> ApprovalWorkflow<P>
where
    P: PageDom,
{
    pub fn new(
        page: Arc<P>,
        context: Arc<AutomationContext>,
        config: ApprovalConfig,
        plan: AutomationPlan,
        sequencer: StepSequencer,
        notifier: Arc<dyn OperatorNotifier>,
    ) -> Self {
        let waiter = ElementWaiter::new(sequencer.timing().wait);
        Self {
            page,
            context,
            config,
            plan,
            sequencer,
            waiter,
            resolver: EntityResolver::default(),
            notifier,
            sink: None,
        }
    }

    pub fn with_resolver(mut self, resolver: EntityResolver) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn with_sink(mut self, sink: Arc<dyn PayloadSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    pub fn config(&self) -> &ApprovalConfig {
        &self.config
    }

    /// Decide what to do with a click on the approve control.
    ///
    /// A click we synthesized ourselves passes exactly once. Any other click is held
    /// back, after making sure "allow unmatched" is ticked.
    pub async fn intercept_click(&self) -> Result<ClickDecision, ApprovalError> {
        if self.context.guard().take() {
            info!("Letting synthesized approve click through");
            return Ok(ClickDecision::PassThrough);
        }

        let selector = &self.config.selectors.allow_unmatched_checkbox;
        let checkbox_ticked = match self.page.query_selector(selector).await? {
            Some(checkbox) if !self.page.is_checked(&checkbox).await? => {
                self.page.click(&checkbox).await?;
                info!("Ticked \"allow unmatched\"");
                true
            }
            Some(_) => false,
            None => {
                warn!(selector = %selector, "\"Allow unmatched\" checkbox not found");
                false
            }
        };
        Ok(ClickDecision::Intercepted { checkbox_ticked })
    }

    /// Price to prefill for the operator, when the form already carries our split.
    pub async fn suggested_price(&self) -> Result<Option<ResalePrice>, ApprovalError> {
        let selectors = &self.config.selectors;
        let (Some(listing), Some(shipping)) = (
            self.page.query_selector(&selectors.listing_price).await?,
            self.page.query_selector(&selectors.shipping_price).await?,
        ) else {
            return Ok(None);
        };
        let listing = self.page.value(&listing).await?.trim().parse::<f64>();
        let shipping = self.page.value(&shipping).await?.trim().parse::<f64>();
        Ok(match (listing, shipping) {
            (Ok(listing), Ok(shipping)) => self.config.pricing.suggested_price(listing, shipping),
            _ => None,
        })
    }

    /// Enter the listing/shipping split of `price` into the form.
    pub async fn write_prices(&self, price: ResalePrice) -> Result<(), ApprovalError> {
        let selectors = &self.config.selectors;
        let (listing, shipping) = price.split(&self.config.pricing);

        let listing_input = self.waiter.wait_for(self.page.as_ref(), &selectors.listing_price).await?;
        let shipping_input = self.waiter.wait_for(self.page.as_ref(), &selectors.shipping_price).await?;

        set_controlled_value(self.page.as_ref(), &listing_input, &cents(listing)).await?;
        set_controlled_value(self.page.as_ref(), &shipping_input, &cents(shipping)).await?;
        info!(listing = %cents(listing), shipping = %cents(shipping), "Listing prices updated");
        Ok(())
    }

    async fn write_prices_logged(&self, price: ResalePrice) -> bool {
        match self.write_prices(price).await {
            Ok(()) => true,
            Err(err) => {
                warn!(error = %err, "Failed to update listing prices");
                false
            }
        }
    }

    /// Capture the consignor record for the listing on screen.
    async fn capture_payload(&self, price: ResalePrice, payout: f64) -> Result<WebhookPayload, ApprovalError> {
        let listing_id = self
            .resolver
            .resolve(self.page.as_ref())
            .await?
            .ok_or(ApprovalError::NoListing)?;
        let seller = self
            .context
            .cache()
            .get(&listing_id)
            .ok_or_else(|| ApprovalError::CacheMiss(listing_id.clone()))?;
        Ok(WebhookPayload::new(listing_id, seller, price.to_string(), cents(payout)))
    }

    async fn click_if_present(&self, selector: &str) -> Result<bool, ApprovalError> {
        match self.page.query_selector(selector).await? {
            Some(control) => {
                self.page.click(&control).await?;
                Ok(true)
            }
            None => {
                warn!(selector, "Control not found");
                Ok(false)
            }
        }
    }

    /// Synthesize the page's own approve click.
    ///
    /// The click is routed through [`Self::intercept_click`] first, so the armed
    /// guard is spent before the page sees the click and never outlives this call.
    async fn release_original_click(&self) -> Result<bool, ApprovalError> {
        self.context.guard().arm();
        match self.intercept_click().await? {
            ClickDecision::PassThrough => {
                self.click_if_present(&self.config.selectors.approve_button)
                    .await
            }
            ClickDecision::Intercepted { .. } => {
                warn!("Guard consumed elsewhere; approve click withheld");
                Ok(false)
            }
        }
    }

    /// Publish the listing: prices, consignor replacement, webhook, then the original approve click.
    ///
    /// With a webhook configured the consignor record must already be cached; a miss
    /// stops here, before anything on the page is changed.
    pub async fn publish(&self, raw_price: &str) -> Result<PublishReport, ApprovalError> {
        let price = self.parse_price(raw_price)?;
        let payout = price.payout(&self.config.pricing);

        let payload = match &self.sink {
            Some(_) => match self.capture_payload(price, payout).await {
                Ok(payload) => Some(payload),
                Err(err) => {
                    warn!(error = %err, "Publish blocked");
                    self.notifier.notify(&err.operator_message());
                    return Err(err);
                }
            },
            None => None,
        };
        let listing_id = match &payload {
            Some(payload) => Some(payload.listing_id.clone()),
            None => self.resolver.resolve(self.page.as_ref()).await.ok().flatten(),
        };

        info!(listing = ?listing_id, price = %price, payout = %cents(payout), "Publishing listing");
        let prices_written = self.write_prices_logged(price).await;

        self.notifier.notify("Updating seller information!");
        let plan = self.sequencer.run(self.page.as_ref(), &self.plan).await;

        let delivery = match (&self.sink, payload) {
            (Some(sink), Some(payload)) => match sink.deliver(&payload).await {
                Ok(()) => DeliveryStatus::Delivered,
                Err(err) => {
                    warn!(error = %err, "Webhook delivery failed");
                    self.notifier
                        .notify("The consignor details could not be sent. Please record them manually.");
                    DeliveryStatus::Failed(err.to_string())
                }
            },
            _ => DeliveryStatus::Disabled,
        };

        let approve_clicked = self.release_original_click().await?;

        Ok(PublishReport {
            listing_id,
            price,
            payout,
            prices_written,
            plan,
            delivery,
            approve_clicked,
        })
    }

    /// Accept the consignment: prices, save, and collect the address for the shipping label.
    pub async fn accept(&self, raw_price: &str) -> Result<AcceptReport, ApprovalError> {
        let price = self.parse_price(raw_price)?;
        let payout = price.payout(&self.config.pricing);

        let prices_written = self.write_prices_logged(price).await;
        let saved = self
            .click_if_present(&self.config.selectors.save_button)
            .await?;

        let address = self.consignor_address().await?;
        match &address {
            Some(address) => self.notifier.notify(&format!(
                "Generate a shipping label for the consignor at: {address}"
            )),
            None => self
                .notifier
                .notify("Error: Could not find the consignor address on the page."),
        }

        Ok(AcceptReport {
            price,
            payout,
            prices_written,
            saved,
            address,
        })
    }

    async fn consignor_address(&self) -> Result<Option<String>, ApprovalError> {
        let selectors = &self.config.selectors;
        let mut parts = Vec::new();
        for selector in [&selectors.address_line1, &selectors.address_line2] {
            if let Some(node) = self.page.query_selector(selector).await? {
                let text = self.page.text_content(&node).await?;
                let text = text.trim();
                if !text.is_empty() {
                    parts.push(text.to_string());
                }
            }
        }
        Ok((!parts.is_empty()).then(|| parts.join(" ")))
    }

    fn parse_price(&self, raw: &str) -> Result<ResalePrice, ApprovalError> {
        ResalePrice::parse(raw).map_err(|err| {
            self.notifier.notify(&err.operator_message());
            err
        })
    }
}
