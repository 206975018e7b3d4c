//! # rmanga-scraper
#![allow(clippy::uninlined_format_args)]
//!
//! Mirrors manga chapters from readmanga and mintmanga to disk by driving a
//! headless browser over WebDriver.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Download every chapter into /data/manga/<manga name>/<chapter>/<n>.jpeg
//! rmanga-scraper "https://readmanga.live/van_pis__A5664" /data/manga
//!
//! # Use Firefox and keep the reader preference between runs
//! rmanga-scraper "https://mintmanga.live/berserk" /data/manga --browser firefox --profile mint
//!
//! # Connect to an already running chromedriver
//! rmanga-scraper "https://readmanga.live/berserk" /data/manga --webdriver-url http://localhost:9515
//! ```
//!
//! Re-running is safe: existing chapter folders are reused and existing
//! images are never fetched again, so only missing pages are downloaded.
//!
//! ## Library Usage
//!
//! ```no_run
//! use rmanga_scraper::{BrowserOptions, scraper, validation};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let args = validation::validate_arguments("https://readmanga.live/berserk", "/data/manga")
//!     .map_err(rmanga_scraper::ScrapeError::Validation)?;
//! let report = scraper::run(&args, &BrowserOptions::default()).await?;
//! println!("{} images saved", report.images_saved());
//! # Ok(())
//! # }
//! ```

/// Chapter discovery on the title page
pub mod discovery;

/// Concurrent image downloads
pub mod download;

/// Error types and exit codes
pub mod errors;

/// Filesystem mirror and its existence predicate
pub mod mirror;

/// Browser page primitives
pub mod page;

/// Lazy page-image enumeration
pub mod pagination;

/// Browser profile directories
pub mod profile;

/// Reader mode preparation
pub mod reader;

/// Scrape pipeline
pub mod scraper;

/// Site selectors and supported services
pub mod selectors;

/// Browser session lifetime
pub mod session;

/// Shared data types
pub mod types;

/// Argument validation
pub mod validation;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use errors::{ScrapeError, ValidationError};
pub use page::{LinkEntry, ReaderPage, Visibility};
pub use types::{BrowserOptions, Chapter, ChapterReport, CommandArgs, ScrapeConfig, ScrapeReport};
pub use webdriver::{Browser, BrowserType};
