use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Args;
use network_tap_light::{
    Fetch, FetchRequest, HttpFetch, NetworkObserver, ObservationOutcome, ObservedFetch,
    RecordCache,
};
use tokio::time::timeout;

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ProbeArgs {
    pub url: String,

    /// Extra request header, `Name: value`
    #[arg(short = 'H', long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Seconds to wait for the observer after the response arrives
    #[arg(long, default_value_t = 5)]
    pub wait_secs: u64,
}

pub async fn cmd_probe(args: ProbeArgs, config: &Config) -> Result<()> {
    let observer = Arc::new(NetworkObserver::new(
        config.observer.clone(),
        RecordCache::new(),
    ));
    let mut events = observer.subscribe();
    let fetch = ObservedFetch::new(HttpFetch::new(), Arc::clone(&observer));

    let mut request = FetchRequest::get(&args.url);
    for header in &args.headers {
        let (name, value) = header
            .split_once(':')
            .with_context(|| format!("Header must look like `Name: value`, got {header:?}"))?;
        request = request.with_header(name.trim(), value.trim());
    }

    let response = fetch.fetch(request).await?;
    println!("{} {} ({} bytes)", response.status, response.url, response.body.len());

    if !observer.matches(&args.url) {
        println!(
            "URL does not contain {:?}; response not inspected",
            config.observer.path_filter
        );
        return Ok(());
    }

    let event = timeout(Duration::from_secs(args.wait_secs), events.recv())
        .await
        .context("Observer did not report in time")??;
    match event.outcome {
        ObservationOutcome::Cached { entity, .. } => {
            let record = observer.cache().get(&entity).unwrap_or_default();
            println!("cached listing {entity}");
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        ObservationOutcome::Ignored => println!("no seller data in response"),
        ObservationOutcome::Dropped { reason } => println!("observation dropped: {reason}"),
    }
    Ok(())
}
