//! Page image URLs of the open chapter, produced one at a time.
//!
//! Each image only appears after clicking past the previous one, so the
//! sequence is strictly ordered, finite, and cannot restart without
//! navigating to the chapter again.

use anyhow::{Context, Result};
use tracing::debug;
use url::Url;

use crate::page::{ReaderPage, Visibility};
use crate::selectors::{MANGA_IMG, NEXT_PAGE_BUTTON, PAGE, PAGE_OPTION};

/// Lazy cursor over the chapter's page images
pub struct PageLinks<'a, P> {
    page: &'a P,
    base: Url,
    total: usize,
    position: usize,
}

impl<'a, P: ReaderPage> PageLinks<'a, P> {
    /// Read the page count from the page selector of the loaded chapter
    pub async fn open(page: &'a P) -> Result<Self> {
        let current = page.current_url().await?;
        let base = Url::parse(&current)
            .with_context(|| format!("Current page has an invalid URL: {}", current))?;

        page.wait_for(PAGE, Visibility::Present).await?;
        let total = page.count(PAGE_OPTION).await?;
        debug!("Chapter has {} page(s)", total);

        Ok(PageLinks {
            page,
            base,
            total,
            position: 0,
        })
    }

    /// Number of pages the chapter reports
    pub fn total(&self) -> usize {
        self.total
    }

    /// Image URL of the next page, or `None` after the last one
    pub async fn next(&mut self) -> Result<Option<String>> {
        if self.position >= self.total {
            return Ok(None);
        }

        if self.position > 0 {
            self.page
                .wait_for(NEXT_PAGE_BUTTON, Visibility::Present)
                .await?;
            self.page.click(NEXT_PAGE_BUTTON).await?;
        }

        self.page.wait_for(MANGA_IMG, Visibility::Present).await?;
        let src = self
            .page
            .attribute(MANGA_IMG, "src")
            .await?
            .with_context(|| format!("Page {} image has no src", self.position + 1))?;

        let url = self
            .base
            .join(&src)
            .with_context(|| format!("Invalid image src: {}", src))?;

        self.position += 1;
        Ok(Some(url.to_string()))
    }

    /// Drain the remaining pages in order
    pub async fn collect(mut self) -> Result<Vec<String>> {
        let mut links = Vec::with_capacity(self.total - self.position);
        while let Some(link) = self.next().await? {
            links.push(link);
        }
        Ok(links)
    }
}
