//! Browser page primitives used by the scrape pipeline

use anyhow::Result;
use serde::Deserialize;

/// Condition a selector wait resolves on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// At least one match in the DOM
    Present,
    /// At least one displayed match
    Visible,
    /// No displayed match (absent counts as hidden)
    Hidden,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Visibility::Present => "present",
            Visibility::Visible => "visible",
            Visibility::Hidden => "hidden",
        };
        f.write_str(label)
    }
}

/// `href` attribute and raw `textContent` of an anchor
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LinkEntry {
    pub href: Option<String>,
    #[serde(default)]
    pub text: String,
}

/// A single open page/tab.
///
/// Every call is a suspension point; the pipeline drives one page
/// sequentially, so implementations need no internal locking beyond
/// what their own state requires.
#[allow(async_fn_in_trait)]
pub trait ReaderPage {
    /// Load a URL and return once DOM content has loaded
    async fn goto(&self, url: &str) -> Result<()>;

    /// Reload the current URL and wait for DOM content
    async fn reload(&self) -> Result<()>;

    async fn current_url(&self) -> Result<String>;

    /// Wait until `selector` satisfies `visibility`, or time out
    async fn wait_for(&self, selector: &str, visibility: Visibility) -> Result<()>;

    /// Whether any element matches, without waiting
    async fn exists(&self, selector: &str) -> Result<bool>;

    /// Whether any matching element is displayed, without waiting
    async fn is_visible(&self, selector: &str) -> Result<bool>;

    /// Click the first matching element
    async fn click(&self, selector: &str) -> Result<()>;

    /// `textContent` of the first matching element
    async fn text_content(&self, selector: &str) -> Result<String>;

    /// Attribute of the first matching element
    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>>;

    /// Number of matching elements
    async fn count(&self, selector: &str) -> Result<usize>;

    /// `href` + `textContent` of every matching element, in DOM order
    async fn link_entries(&self, selector: &str) -> Result<Vec<LinkEntry>>;
}
