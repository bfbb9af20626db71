use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::{Args, Subcommand};
use tokio::fs;
use tracing::info;

use super::context::CliContext;
use super::runtime::read_config_file;
use crate::config::Config;

#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Clone, Debug)]
pub enum ConfigAction {
    /// Show the effective configuration (file, defaults and environment overrides)
    Show,

    /// Write the default configuration to the config path
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Validate the configuration file
    Validate,
}

pub async fn cmd_config(args: ConfigArgs, ctx: &CliContext) -> Result<()> {
    let path = ctx.config_path();
    match args.action {
        ConfigAction::Show => {
            println!("Effective configuration ({}):", path.display());
            println!("{}", serde_yaml::to_string(ctx.config())?);
        }
        ConfigAction::Init { force } => {
            if path.exists() && !force {
                bail!(
                    "{} already exists; pass --force to overwrite it",
                    path.display()
                );
            }
            save_config_file(path, &Config::default()).await?;
            println!("Default configuration written to {}", path.display());
        }
        ConfigAction::Validate => {
            let config = read_config_file(path).await?;
            validate(&config)?;
            println!("Configuration is valid ({} plan steps)", config.plan.len());
        }
    }
    Ok(())
}

fn validate(config: &Config) -> Result<()> {
    if config.observer.path_filter.trim().is_empty() {
        bail!("observer.path_filter must not be empty");
    }
    if config.reconcile.bindings.is_empty() {
        bail!("reconcile.bindings must list at least one display node");
    }
    if let Some(url) = &config.webhook.url {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            bail!("webhook.url must be an http(s) URL, got {url}");
        }
    }
    let pricing = &config.approval.pricing;
    for (name, share) in [
        ("payout_rate", pricing.payout_rate),
        ("listing_share", pricing.listing_share),
    ] {
        if !(0.0..=1.0).contains(&share) {
            bail!("approval.pricing.{name} must be between 0 and 1, got {share}");
        }
    }
    Ok(())
}

async fn save_config_file(path: &Path, config: &Config) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let yaml = serde_yaml::to_string(config)?;
    fs::write(path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Saved configuration to {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(validate(&Config::default()).is_ok());
    }

    #[test]
    fn bad_webhook_scheme_is_rejected() {
        let mut config = Config::default();
        config.webhook.url = Some("ftp://example.com".into());
        assert!(validate(&config).is_err());
    }

    #[tokio::test]
    async fn init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yaml");

        save_config_file(&path, &Config::default()).await.unwrap();
        let loaded = read_config_file(&path).await.unwrap();

        assert_eq!(loaded, Config::default());
    }
}
