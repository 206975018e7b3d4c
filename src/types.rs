use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

use crate::webdriver::BrowserType;

/// One chapter link discovered on a title page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    /// Chapter href as found in the DOM (usually relative)
    pub link: String,
    /// Sanitized chapter label, used verbatim as a directory name
    pub title: String,
}

/// Arguments accepted by the CLI after validation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandArgs {
    /// Manga title page URL
    pub manga_title_page: String,
    /// Existing destination directory
    pub save_path: PathBuf,
}

/// Everything the chapter loop needs, assembled once before it starts
#[derive(Debug, Clone)]
pub struct ScrapeConfig {
    pub manga_name: String,
    /// Chapters in reading order (oldest first)
    pub chapters: Vec<Chapter>,
    /// Scheme + host of the title page, with an empty path
    pub url_origin: Url,
    pub save_path: PathBuf,
}

impl ScrapeConfig {
    /// Derive the URL origin from the title page
    pub fn new(
        manga_name: String,
        chapters: Vec<Chapter>,
        manga_title_page: &str,
        save_path: &Path,
    ) -> Result<Self> {
        let mut url_origin = Url::parse(manga_title_page)
            .with_context(|| format!("Invalid manga title page: {}", manga_title_page))?;
        url_origin.set_path("/");
        url_origin.set_query(None);
        url_origin.set_fragment(None);

        Ok(ScrapeConfig {
            manga_name,
            chapters,
            url_origin,
            save_path: save_path.to_path_buf(),
        })
    }

    /// Folder that mirrors the whole manga
    pub fn manga_dir(&self) -> PathBuf {
        self.save_path.join(&self.manga_name)
    }

    /// Folder that mirrors one chapter.
    ///
    /// The title is joined as-is: chapters sharing a title share a folder,
    /// and a title of `..` or one containing a separator lands outside
    /// [`ScrapeConfig::manga_dir`].
    pub fn chapter_dir(&self, chapter: &Chapter) -> PathBuf {
        self.manga_dir().join(&chapter.title)
    }

    /// Absolute URL of a chapter reader page
    pub fn chapter_url(&self, chapter: &Chapter) -> Result<Url> {
        self.url_origin
            .join(&chapter.link)
            .with_context(|| format!("Invalid chapter link: {}", chapter.link))
    }
}

/// How the browser session is launched
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    /// Firefox or Chrome
    pub browser: BrowserType,
    /// Run without a visible window
    pub headless: bool,
    /// Named persistent profile (temporary profile if None)
    pub profile: Option<String>,
    /// Externally managed WebDriver endpoint; auto-started if None
    pub webdriver_url: Option<String>,
    /// Upper bound for every selector wait
    pub wait_timeout: Duration,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        BrowserOptions {
            browser: BrowserType::Chrome,
            headless: true,
            profile: None,
            webdriver_url: None,
            wait_timeout: Duration::from_secs(30),
        }
    }
}

/// Totals for a single chapter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterReport {
    pub title: String,
    pub pages: usize,
    pub saved: usize,
    pub skipped: usize,
}

/// Totals for a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    pub manga_name: String,
    pub chapters: Vec<ChapterReport>,
}

impl ScrapeReport {
    pub fn images_saved(&self) -> usize {
        self.chapters.iter().map(|c| c.saved).sum()
    }

    pub fn images_skipped(&self) -> usize {
        self.chapters.iter().map(|c| c.skipped).sum()
    }
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
