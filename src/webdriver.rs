use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::path::Path;
use std::time::Duration;
use tokio::time::{Instant, sleep};
use tracing::{debug, info};

use crate::page::{LinkEntry, ReaderPage, Visibility};
use crate::types::BrowserOptions;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Browser instance for WebDriver automation
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
    wait_timeout: Duration,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl BrowserType {
    /// Name of the WebDriver executable for this browser
    pub fn driver_command(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Port the driver listens on by default
    pub fn default_port(&self) -> u16 {
        match self {
            BrowserType::Firefox => 4444,
            BrowserType::Chrome => 9515,
        }
    }
}

/// Build the W3C capabilities for a session
pub(crate) fn capabilities(
    options: &BrowserOptions,
    profile_path: &Path,
) -> serde_json::Map<String, serde_json::Value> {
    let mut caps = serde_json::Map::new();

    // "eager" returns from navigation on DOMContentLoaded
    caps.insert("pageLoadStrategy".to_string(), json!("eager"));

    match options.browser {
        BrowserType::Firefox => {
            let mut args = Vec::new();
            if options.headless {
                args.push("--headless".to_string());
            }
            args.push("-profile".to_string());
            args.push(profile_path.display().to_string());

            caps.insert("moz:firefoxOptions".to_string(), json!({ "args": args }));
        }
        BrowserType::Chrome => {
            let mut args = vec!["--no-sandbox".to_string()];

            if options.headless {
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
                args.push("--disable-dev-shm-usage".to_string());
            }

            args.push(format!("--user-data-dir={}", profile_path.display()));

            caps.insert("goog:chromeOptions".to_string(), json!({ "args": args }));
        }
    }

    caps
}

impl Browser {
    /// Open a new browser session on a running WebDriver
    ///
    /// # Arguments
    /// * `webdriver_url` - Endpoint of geckodriver/chromedriver
    /// * `options` - Browser type, headless flag and wait timeout
    /// * `profile_path` - Profile directory the browser stores preferences in
    pub async fn connect(
        webdriver_url: &str,
        options: &BrowserOptions,
        profile_path: &Path,
    ) -> Result<Self> {
        info!("Connecting to {:?} WebDriver at {}", options.browser, webdriver_url);

        let client = ClientBuilder::rustls()
            .capabilities(capabilities(options, profile_path))
            .connect(webdriver_url)
            .await
            .context("Failed to connect to WebDriver")?;

        Ok(Browser {
            client,
            browser_type: options.browser,
            wait_timeout: options.wait_timeout,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    /// Poll until the document has left the "loading" state
    async fn wait_for_dom_content(&self) -> Result<()> {
        let script = "return document.readyState !== 'loading';";
        let deadline = Instant::now() + self.wait_timeout;

        loop {
            match self.client.execute(script, vec![]).await {
                Ok(val) if val.as_bool().unwrap_or(false) => return Ok(()),
                _ if Instant::now() >= deadline => {
                    anyhow::bail!(
                        "Operation timed out after {}s waiting for DOM content",
                        self.wait_timeout.as_secs()
                    )
                }
                _ => sleep(POLL_INTERVAL).await,
            }
        }
    }

    /// Whether `selector` currently satisfies `visibility`
    async fn check(&self, selector: &str, visibility: Visibility) -> Result<bool> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;

        match visibility {
            Visibility::Present => Ok(!elements.is_empty()),
            Visibility::Visible | Visibility::Hidden => {
                let mut displayed = false;
                for element in &elements {
                    // Elements replaced mid-check count as not displayed
                    if element.is_displayed().await.unwrap_or(false) {
                        displayed = true;
                        break;
                    }
                }
                Ok(displayed == (visibility == Visibility::Visible))
            }
        }
    }

    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

impl ReaderPage for Browser {
    async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to {}", url);
        self.client
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        self.wait_for_dom_content().await
    }

    async fn reload(&self) -> Result<()> {
        debug!("Reloading page");
        self.client.refresh().await.context("Failed to reload page")?;
        self.wait_for_dom_content().await
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.client.current_url().await?.to_string())
    }

    async fn wait_for(&self, selector: &str, visibility: Visibility) -> Result<()> {
        debug!("Waiting for '{}' to be {}", selector, visibility);
        let deadline = Instant::now() + self.wait_timeout;

        loop {
            // Transient errors (stale references during re-render) are retried until the deadline
            if let Ok(true) = self.check(selector, visibility).await {
                return Ok(());
            }
            if Instant::now() >= deadline {
                anyhow::bail!(
                    "Operation timed out after {}s waiting for '{}' to be {}",
                    self.wait_timeout.as_secs(),
                    selector,
                    visibility
                );
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        self.check(selector, Visibility::Present).await
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        self.check(selector, Visibility::Visible).await
    }

    async fn click(&self, selector: &str) -> Result<()> {
        debug!("Clicking {}", selector);
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .context(format!("Element not found: {}", selector))?;

        element
            .click()
            .await
            .context(format!("Failed to click {}", selector))?;
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        let script = r#"
            const element = document.querySelector(arguments[0]);
            return element ? element.textContent : null;
        "#;

        let value = self
            .client
            .execute(script, vec![json!(selector)])
            .await
            .context("Failed to execute script")?;

        value
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("No elements found matching selector: {}", selector))
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let element = self
            .client
            .find(Locator::Css(selector))
            .await
            .context(format!("Element not found: {}", selector))?;

        Ok(element.attr(name).await?)
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        Ok(self.client.find_all(Locator::Css(selector)).await?.len())
    }

    async fn link_entries(&self, selector: &str) -> Result<Vec<LinkEntry>> {
        let script = r#"
            return Array.from(document.querySelectorAll(arguments[0])).map((element) => ({
                href: element.getAttribute('href'),
                text: element.textContent || ''
            }));
        "#;

        let value = self
            .client
            .execute(script, vec![json!(selector)])
            .await
            .context("Failed to execute script")?;

        serde_json::from_value(value).context("Unexpected link list returned by the page")
    }
}
