//! One browser with one page for a single scrape invocation

use anyhow::Result;
use tracing::{debug, info};

use crate::profile::{ProfileDir, ProfileManager, temporary_profile};
use crate::types::BrowserOptions;
use crate::webdriver::Browser;
use crate::webdriver_manager::WebDriverManager;

/// Exclusive owner of the browser handle, its driver process and its profile.
///
/// Steps borrow the page through [`Session::page`]; nothing else holds it.
pub struct Session {
    browser: Browser,
    drivers: WebDriverManager,
    // Dropped after the browser so a temporary profile outlives it
    _profile: ProfileDir,
}

impl Session {
    /// Launch the browser (starting a WebDriver if needed) and open its page
    pub async fn open(options: &BrowserOptions) -> Result<Self> {
        let profile = match options.profile.as_deref() {
            Some(name) => ProfileManager::new()?.persistent(name)?,
            None => temporary_profile()?,
        };

        let mut drivers = WebDriverManager::new();
        let webdriver_url = match &options.webdriver_url {
            Some(url) => url.clone(),
            None => drivers.ensure_driver(options.browser).await?,
        };

        let browser = Browser::connect(&webdriver_url, options, profile.path()).await?;
        info!(
            "Opened {:?} session with profile {}",
            browser.browser_type(),
            profile.path().display()
        );

        Ok(Session {
            browser,
            drivers,
            _profile: profile,
        })
    }

    pub fn page(&self) -> &Browser {
        &self.browser
    }

    /// Close the page and browser, then stop any driver this session started.
    ///
    /// Drivers are stopped even when closing the browser fails; that error is
    /// returned for the caller to report.
    pub async fn close(self) -> Result<()> {
        let Session {
            browser,
            mut drivers,
            _profile,
        } = self;

        let closed = browser.close().await;

        debug!("Stopping {} managed WebDriver(s)", drivers.managed_count());
        drivers.stop_all();
        closed
    }
}
