use std::env;
use std::fs as stdfs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

/// Export `KEY=value` lines from `config/local.env` unless already set.
pub fn load_local_env_overrides() {
    let path = Path::new("config/local.env");
    if !path.exists() {
        return;
    }

    match stdfs::read_to_string(path) {
        Ok(contents) => {
            for (key, value) in parse_env_lines(&contents) {
                if env::var(&key).is_err() {
                    env::set_var(key, value);
                }
            }
        }
        Err(err) => {
            warn!(path = %path.display(), ?err, "failed to read local.env overrides");
        }
    }
}

pub(crate) fn parse_env_lines(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .map(|(key, value)| (key.trim(), value.trim()))
        .filter(|(key, _)| !key.is_empty())
        .map(|(key, value)| (key.to_string(), unquote(value)))
        .collect()
}

fn unquote(value: &str) -> String {
    value
        .strip_prefix('"')
        .and_then(|inner| inner.strip_suffix('"'))
        .map(|inner| inner.replace("\\\"", "\""))
        .unwrap_or_else(|| value.to_string())
}

pub fn init_logging(level: &str, debug: bool) -> Result<()> {
    let level = if debug {
        tracing::Level::DEBUG
    } else {
        level.parse().context("Invalid log level")?
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.to_string())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    Ok(())
}

pub struct LoadedConfig {
    pub config: Config,
    pub path: PathBuf,
}

pub fn default_config_path() -> Result<PathBuf> {
    // Priority: ./config/config.yaml > ~/.config/consign-pilot/config.yaml
    let local_config = PathBuf::from("config/config.yaml");
    if local_config.exists() {
        return Ok(local_config);
    }
    let mut path = dirs::config_dir().context("Failed to get config directory")?;
    path.push("consign-pilot");
    path.push("config.yaml");
    Ok(path)
}

/// Read the configuration file, falling back to defaults when it does not exist,
/// then apply environment overrides.
pub async fn load_config(config_path: Option<&PathBuf>) -> Result<LoadedConfig> {
    let path = match config_path {
        Some(path) => path.clone(),
        None => default_config_path()?,
    };

    let mut config = read_config_file(&path).await?;
    config.apply_env_overrides();
    Ok(LoadedConfig { config, path })
}

pub async fn read_config_file(path: &Path) -> Result<Config> {
    if !path.exists() {
        warn!("Config file not found, using defaults: {}", path.display());
        return Ok(Config::default());
    }

    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: Config = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    info!("Loaded configuration from: {}", path.display());
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_lines_skip_comments_and_unquote() {
        let parsed = parse_env_lines(
            "# local overrides\n\nCONSIGN_WEBHOOK_URL=\"https://hooks.example.com/x\"\nBROKEN\n RUST_LOG = debug \n",
        );
        assert_eq!(
            parsed,
            vec![
                (
                    "CONSIGN_WEBHOOK_URL".to_string(),
                    "https://hooks.example.com/x".to_string()
                ),
                ("RUST_LOG".to_string(), "debug".to_string()),
            ]
        );
    }
}
