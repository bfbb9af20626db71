use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use network_tap_light::extract_from_body;
use tokio::fs;

use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ExtractArgs {
    /// Saved response body (JSON)
    pub file: PathBuf,
}

pub async fn cmd_extract(args: ExtractArgs, config: &Config) -> Result<()> {
    let body = fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;

    match extract_from_body(&body, &config.observer.identifier_fields)? {
        Some((id, record)) => {
            println!("listing: {id}");
            println!("{}", serde_json::to_string_pretty(&record)?);
        }
        None => println!("No seller data in {}", args.file.display()),
    }
    Ok(())
}
