use chromiumoxide::browser::{Browser, BrowserConfig};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CdpConfig;
use crate::errors::{AdapterError, AdapterErrorKind};
use crate::page::CdpPage;

/// A connected browser plus the task driving its CDP handler.
pub struct BrowserSession {
    browser: Browser,
    handler: Option<JoinHandle<()>>,
    config: CdpConfig,
}

impl BrowserSession {
    /// Attach to `websocket_url` when configured, otherwise launch Chromium.
    pub async fn start(config: CdpConfig) -> Result<Self, AdapterError> {
        let (browser, mut handler) = match &config.websocket_url {
            Some(url) => {
                info!(url = %url, "Attaching to running browser");
                Browser::connect(url.clone()).await?
            }
            None => {
                info!(headless = config.headless, "Launching browser");
                Browser::launch(browser_config(&config)?)
                    .await
                    .map_err(|err| {
                        AdapterError::new(AdapterErrorKind::Launch).with_hint(err.to_string())
                    })?
            }
        };

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(err) = event {
                    warn!(error = %err, "CDP handler error");
                }
            }
            debug!("CDP handler finished");
        });

        Ok(Self {
            browser,
            handler: Some(handler),
            config,
        })
    }

    /// First open tab whose URL contains `start_url`, or a new tab on it.
    pub async fn page(&mut self) -> Result<CdpPage, AdapterError> {
        let target = self.config.start_url.clone();
        if let Err(err) = self.browser.fetch_targets().await {
            debug!(error = %err, "Target discovery failed, using known pages");
        }

        for page in self.browser.pages().await? {
            match page.url().await {
                Ok(Some(url)) if url.contains(&target) => {
                    info!(url = %url, "Driving existing tab");
                    return Ok(CdpPage::new(page));
                }
                Ok(_) => {}
                Err(err) => debug!(error = %err, "Skipping unreadable tab"),
            }
        }

        info!(url = %target, "Opening new tab");
        let page = self.browser.new_page(target.as_str()).await.map_err(|err| {
            AdapterError::new(AdapterErrorKind::NoPage).with_hint(err.to_string())
        })?;
        Ok(CdpPage::new(page))
    }

    /// Close a launched browser; an attached one is only disconnected.
    pub async fn close(mut self) -> Result<(), AdapterError> {
        if self.config.websocket_url.is_none() {
            self.browser.close().await?;
        }
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            handler.abort();
        }
    }
}

fn browser_config(cfg: &CdpConfig) -> Result<BrowserConfig, AdapterError> {
    let mut builder = BrowserConfig::builder().request_timeout(cfg.request_timeout());
    if !cfg.headless {
        builder = builder.with_head();
    }
    if let Some(executable) = &cfg.executable {
        if !executable.exists() {
            return Err(AdapterError::new(AdapterErrorKind::Launch).with_hint(format!(
                "chrome executable not found at {}",
                executable.display()
            )));
        }
        builder = builder.chrome_executable(executable.clone());
    }
    if let Some(dir) = &cfg.user_data_dir {
        builder = builder.user_data_dir(dir.clone());
    }
    builder.build().map_err(|err| {
        AdapterError::new(AdapterErrorKind::Internal).with_hint(format!("browser config error: {err}"))
    })
}
