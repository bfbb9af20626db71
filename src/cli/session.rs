use std::sync::Arc;

use action_flow::StepSequencer;
use action_primitives::PageDom;
use anyhow::{Context, Result};
use cdp_adapter::{BrowserSession, ResponseTap};
use clap::Args;
use display_sync::Reconciler;
use network_tap_light::NetworkObserver;
use perceiver_structural::EntityResolver;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use super::context::CliContext;
use crate::approval::{
    ApprovalWorkflow, ClickDecision, DeliveryStatus, LogNotifier, WebhookSink,
};
use crate::context::AutomationContext;
use crate::route_guard::{ListingSession, RouteGuard};

const HELP: &str = "commands: review | publish <price> | accept <price> | status | help | quit";

#[derive(Args, Clone, Debug)]
pub struct SessionArgs {
    /// DevTools websocket URL of a running browser
    #[arg(long, value_name = "URL")]
    pub ws: Option<String>,

    /// Dashboard URL (or fragment of an open tab's URL)
    #[arg(long)]
    pub url: Option<String>,

    /// Launch the browser headless
    #[arg(long)]
    pub headless: bool,
}

/// One operator command read from stdin
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionCommand {
    /// Hold the approve action: tick "allow unmatched" and suggest a price
    Review,
    Publish(String),
    Accept(String),
    Status,
    Help,
    Quit,
}

impl SessionCommand {
    /// `Ok(None)` for blank lines.
    pub fn parse(line: &str) -> Result<Option<Self>, String> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Ok(None);
        };
        let rest = words.collect::<Vec<_>>().join(" ");
        let price = |name: &str| {
            if rest.is_empty() {
                Err(format!("usage: {name} <price>"))
            } else {
                Ok(rest.clone())
            }
        };
        let command = match verb.to_ascii_lowercase().as_str() {
            "review" => SessionCommand::Review,
            "publish" => SessionCommand::Publish(price("publish")?),
            "accept" => SessionCommand::Accept(price("accept")?),
            "status" => SessionCommand::Status,
            "help" | "?" => SessionCommand::Help,
            "quit" | "exit" => SessionCommand::Quit,
            other => return Err(format!("unknown command {other:?}; {HELP}")),
        };
        Ok(Some(command))
    }
}

pub async fn cmd_session(args: SessionArgs, ctx: &CliContext) -> Result<()> {
    let config = ctx.config();

    let mut browser_config = config.browser.clone();
    if let Some(ws) = args.ws {
        browser_config.websocket_url = Some(ws);
    }
    if let Some(url) = args.url {
        browser_config.start_url = url;
    }
    browser_config.headless |= args.headless;
    let max_in_flight = browser_config.max_in_flight;

    let mut browser = BrowserSession::start(browser_config)
        .await
        .context("Failed to start browser session")?;
    let page = Arc::new(browser.page().await.context("Failed to open dashboard tab")?);

    let context = Arc::new(AutomationContext::new());
    let observer = Arc::new(NetworkObserver::new(
        config.observer.clone(),
        context.cache().clone(),
    ));
    let tap = ResponseTap::new(Arc::clone(&observer))
        .with_capacity(max_in_flight)
        .attach(&page)
        .await
        .context("Failed to watch network responses")?;

    let resolver = EntityResolver::new(config.resolver.clone());
    let reconciler = Reconciler::new(
        Arc::clone(&page),
        resolver.clone(),
        context.cache().clone(),
        config.reconcile.clone(),
    );
    let mut listing = ListingSession::new(
        Arc::clone(&page),
        RouteGuard::new(config.route.clone()),
        reconciler,
    );

    let mut workflow = ApprovalWorkflow::new(
        Arc::clone(&page),
        Arc::clone(&context),
        config.approval.clone(),
        config.plan.clone(),
        StepSequencer::new(config.timing),
        Arc::new(LogNotifier),
    )
    .with_resolver(resolver.clone());
    match WebhookSink::from_config(&config.webhook)? {
        Some(sink) => {
            info!(url = %sink.url(), "Webhook delivery enabled");
            workflow = workflow.with_sink(Arc::new(sink));
        }
        None => info!("No webhook configured; consignor details will not be reported"),
    }

    println!("{HELP}");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut route_ticker = interval(config.route.poll_interval());
    route_ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = context.child_token();

    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
            _ = route_ticker.tick() => {
                if let Err(err) = listing.sync().await {
                    debug!(error = %err, "Route check failed");
                }
            }
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read stdin")? else {
                    break;
                };
                match SessionCommand::parse(&line) {
                    Ok(None) => {}
                    Ok(Some(SessionCommand::Quit)) => break,
                    Ok(Some(command)) => {
                        run_command(command, &workflow, &listing, &observer, &resolver, page.as_ref()).await;
                    }
                    Err(message) => println!("{message}"),
                }
            }
        }
    }

    listing.teardown().await;
    if let Err(err) = tap.shutdown().await {
        warn!(error = %err, "Response tap ended abnormally");
    }
    context.teardown();
    browser.close().await?;
    Ok(())
}

async fn run_command<P>(
    command: SessionCommand,
    workflow: &ApprovalWorkflow<P>,
    listing: &ListingSession<P>,
    observer: &NetworkObserver,
    resolver: &EntityResolver,
    page: &P,
) where
    P: PageDom + 'static,
{
    let pricing = &workflow.config().pricing;
    match command {
        SessionCommand::Review => match workflow.intercept_click().await {
            Ok(ClickDecision::Intercepted { checkbox_ticked }) => {
                if checkbox_ticked {
                    println!("ticked \"allow unmatched\"");
                }
                match workflow.suggested_price().await {
                    Ok(Some(price)) => println!(
                        "suggested resale price ${price} (consignor paid ${:.2})",
                        price.payout(pricing)
                    ),
                    Ok(None) => println!("no suggested price; enter one with publish/accept"),
                    Err(err) => println!("could not read current prices: {err}"),
                }
            }
            Ok(ClickDecision::PassThrough) => println!("pending synthesized click released"),
            Err(err) => println!("review failed: {err}"),
        },
        SessionCommand::Publish(raw) => match workflow.publish(&raw).await {
            Ok(report) => {
                println!(
                    "published at ${} (payout ${:.2}); plan {}/{} steps, {}/{} fields",
                    report.price,
                    report.payout,
                    report.plan.completed_steps(),
                    report.plan.steps.len(),
                    report.plan.completed_fields(),
                    report.plan.total_fields(),
                );
                if !report.prices_written {
                    println!("warning: listing prices were not updated");
                }
                match report.delivery {
                    DeliveryStatus::Delivered => println!("consignor details reported"),
                    DeliveryStatus::Failed(err) => println!("webhook failed: {err}"),
                    DeliveryStatus::Disabled => {}
                }
                if !report.approve_clicked {
                    println!("warning: approve control not found; approve manually");
                }
            }
            Err(err) => println!("{}", err.operator_message()),
        },
        SessionCommand::Accept(raw) => match workflow.accept(&raw).await {
            Ok(report) => {
                println!(
                    "accepted at ${} (payout ${:.2}), saved: {}",
                    report.price, report.payout, report.saved
                );
                if let Some(address) = report.address {
                    println!("consignor address: {address}");
                }
            }
            Err(err) => println!("{}", err.operator_message()),
        },
        SessionCommand::Status => {
            let entity = resolver.resolve(page).await.ok().flatten();
            let cached = entity
                .as_ref()
                .map(|id| observer.cache().contains(id))
                .unwrap_or(false);
            println!(
                "listing: {}, seller cached: {}, reconciliation: {}, cached records: {}",
                entity.map(|id| id.to_string()).unwrap_or_else(|| "-".into()),
                cached,
                if listing.is_active() { "running" } else { "stopped" },
                observer.cache().len()
            );
        }
        SessionCommand::Help => println!("{HELP}"),
        SessionCommand::Quit => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse_with_prices() {
        assert_eq!(
            SessionCommand::parse("publish $120.00").unwrap(),
            Some(SessionCommand::Publish("$120.00".into()))
        );
        assert_eq!(
            SessionCommand::parse("  ACCEPT 80 ").unwrap(),
            Some(SessionCommand::Accept("80".into()))
        );
        assert_eq!(SessionCommand::parse("").unwrap(), None);
        assert_eq!(
            SessionCommand::parse("exit").unwrap(),
            Some(SessionCommand::Quit)
        );
    }

    #[test]
    fn missing_price_and_unknown_verbs_are_errors() {
        assert_eq!(
            SessionCommand::parse("publish").unwrap_err(),
            "usage: publish <price>"
        );
        assert!(SessionCommand::parse("approve 10").is_err());
    }
}
