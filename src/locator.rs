use std::fmt;
use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::{Client, Locator};
use tokio::time::{Instant, sleep};
use tracing::debug;

use crate::errors::AwxpilotError;

/// Interval between lookups while waiting for the page to render.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// A selector for interactive elements, normalized to CSS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum By {
    Id(String),
    Class(String),
    Css(String),
}

impl By {
    pub fn id(value: &str) -> Self {
        By::Id(value.to_string())
    }

    pub fn class(value: &str) -> Self {
        By::Class(value.to_string())
    }

    pub fn css(value: &str) -> Self {
        By::Css(value.to_string())
    }

    /// The CSS selector string this resolves to.
    pub fn to_css(&self) -> String {
        match self {
            By::Id(v) => format!("#{}", v),
            By::Class(v) => format!(".{}", v),
            By::Css(v) => v.clone(),
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_css())
    }
}

/// Resolves interactive elements from the current page.
///
/// `find_all` treats absence as an empty result; `find_one` treats it as
/// fatal. The `wait_*` methods poll for a condition with a timeout instead
/// of sleeping blind, which is what the timing-sensitive workflow steps
/// (post-login, post-search, post-save) use.
pub struct ElementLocator<'a> {
    client: &'a Client,
}

impl<'a> ElementLocator<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// All elements matching the selector, in document order. An empty
    /// result is not an error; callers index only after checking.
    pub async fn find_all(&self, by: &By) -> Result<Vec<Element>> {
        let css = by.to_css();
        self.client
            .find_all(Locator::Css(&css))
            .await
            .with_context(|| format!("lookup of '{}' failed", css))
    }

    /// The first element matching the selector, or
    /// [`AwxpilotError::ElementNotFound`] when nothing matches.
    pub async fn find_one(&self, by: &By) -> Result<Element> {
        self.find_all(by)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AwxpilotError::ElementNotFound(by.to_css()).into())
    }

    /// The first element matching the selector inside `parent`.
    pub async fn find_in(&self, parent: &Element, by: &By) -> Result<Element> {
        let css = by.to_css();
        let found = parent
            .find_all(Locator::Css(&css))
            .await
            .with_context(|| format!("scoped lookup of '{}' failed", css))?;
        found
            .into_iter()
            .next()
            .ok_or_else(|| AwxpilotError::ElementNotFound(css).into())
    }

    /// Poll until at least one element matches, or fail with
    /// [`AwxpilotError::WaitTimeout`] on expiry.
    pub async fn wait_for(&self, by: &By, timeout: Duration) -> Result<Element> {
        let found = self.wait_for_count(by, 1, timeout).await?;
        found
            .into_iter()
            .next()
            .ok_or_else(|| AwxpilotError::ElementNotFound(by.to_css()).into())
    }

    /// Poll until at least `min` elements match, or fail with
    /// [`AwxpilotError::WaitTimeout`] on expiry.
    ///
    /// Lookup errors during polling are treated as "not rendered yet": a
    /// page mid-navigation can reject commands transiently.
    pub async fn wait_for_count(
        &self,
        by: &By,
        min: usize,
        timeout: Duration,
    ) -> Result<Vec<Element>> {
        let css = by.to_css();
        let deadline = Instant::now() + timeout;
        loop {
            match self.client.find_all(Locator::Css(&css)).await {
                Ok(found) if found.len() >= min => return Ok(found),
                Ok(found) => {
                    debug!("waiting for {} x '{}', have {}", min, css, found.len());
                }
                Err(e) => debug!("lookup of '{}' not ready yet: {}", css, e),
            }
            if Instant::now() >= deadline {
                return Err(AwxpilotError::WaitTimeout {
                    selector: css,
                    timeout,
                }
                .into());
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    /// Bounded pause for re-renders with no pollable condition. A blunt
    /// instrument, used only where nothing concrete can be waited on.
    pub async fn settle(&self, duration: Duration) {
        sleep(duration).await;
    }
}

#[cfg(test)]
#[path = "locator_test.rs"]
mod locator_test;
