use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tempfile::TempDir;
use tracing::{debug, warn};

use crate::errors::AwxpilotError;
use crate::locator::ElementLocator;

/// One live remote-controlled browser, exclusively owned for one run.
///
/// Created at run start, used for every DOM interaction, closed exactly once
/// at run end on every exit path.
pub struct BrowserSession {
    client: Option<Client>,
    // Keeps the per-run Chrome profile directory alive until the session is
    // dropped; Chrome refuses to share a user-data-dir between processes.
    _user_data_dir: TempDir,
}

/// Build the `goog:chromeOptions` capability map for a flag list.
pub fn chrome_capabilities(args: &[String]) -> serde_json::Map<String, serde_json::Value> {
    let mut chrome_opts = serde_json::Map::new();
    chrome_opts.insert("args".to_string(), json!(args));

    let mut caps = serde_json::Map::new();
    caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));
    caps
}

impl BrowserSession {
    /// Launch a Chrome session with the caller-supplied startup flags.
    ///
    /// Fails with [`AwxpilotError::SessionStart`] if the WebDriver session
    /// cannot be established.
    pub async fn open(webdriver_url: &str, chrome_args: &[String]) -> Result<Self> {
        // Both failure modes of open share the SessionStart surface
        let user_data_dir = tempfile::Builder::new()
            .prefix("awxpilot-")
            .tempdir()
            .map_err(|e| {
                AwxpilotError::SessionStart(format!("could not create user-data dir: {}", e))
            })?;

        let mut args = chrome_args.to_vec();
        args.push(format!("--user-data-dir={}", user_data_dir.path().display()));

        debug!("Connecting to WebDriver at {}", webdriver_url);
        let client = ClientBuilder::rustls()
            .capabilities(chrome_capabilities(&args))
            .connect(webdriver_url)
            .await
            .map_err(|e| AwxpilotError::SessionStart(e.to_string()))?;

        Ok(Self {
            client: Some(client),
            _user_data_dir: user_data_dir,
        })
    }

    /// Load a URL into the current page.
    ///
    /// The remote process does not guarantee synchronous load completion, so
    /// a navigation error is logged and swallowed here; a genuinely dead
    /// target surfaces downstream as an element-not-found condition.
    pub async fn navigate(&self, url: &str) {
        match &self.client {
            Some(client) => {
                debug!("Navigating to {}", url);
                if let Err(e) = client.goto(url).await {
                    warn!("Navigation to {} reported an error: {}", url, e);
                }
            }
            None => warn!("navigate({}) on a closed session", url),
        }
    }

    /// Execute an inline script against the current page.
    ///
    /// Element handles pass through `args` serialized as WebDriver element
    /// references. Used only for the source-path DOM patch.
    pub async fn execute(
        &self,
        script: &str,
        args: Vec<serde_json::Value>,
    ) -> Result<serde_json::Value> {
        self.client()?
            .execute(script, args)
            .await
            .context("Failed to execute script")
    }

    /// Element lookups against the current page.
    pub fn locator(&self) -> Result<ElementLocator<'_>> {
        Ok(ElementLocator::new(self.client()?))
    }

    /// Terminate the browser. Idempotent: closing an already-closed session
    /// is a no-op, not an error.
    pub async fn close(&mut self) -> Result<()> {
        if let Some(client) = self.client.take() {
            client.close().await.context("Failed to close browser")?;
        }
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> Result<&Client> {
        self.client
            .as_ref()
            .context("browser session already closed")
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;
