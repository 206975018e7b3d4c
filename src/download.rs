//! Image downloads into the mirror

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::fs::{self, File};
use tokio::io::AsyncWriteExt;
use tokio::task::JoinSet;
use tracing::{debug, warn};

use crate::errors::ScrapeError;
use crate::mirror::resource_exists;

/// What happened to one image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Fetched and written
    Saved { bytes: u64 },
    /// Target file already existed; nothing was fetched
    Skipped,
}

/// One image to fetch into `dir/file_name`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageJob {
    pub url: String,
    pub dir: PathBuf,
    pub file_name: String,
}

/// Per-batch totals
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub saved: usize,
    pub skipped: usize,
}

/// Streams images to disk; cheap to clone across download tasks
#[derive(Debug, Clone)]
pub struct Downloader {
    client: reqwest::Client,
}

impl Downloader {
    pub fn new() -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Downloader { client })
    }

    /// Fetch `url` into `dir/name` unless that file already exists.
    ///
    /// The body is streamed into `name.part` and renamed on completion, so an
    /// interrupted transfer never looks like a finished image.
    pub async fn download_image(
        &self,
        url: &str,
        dir: &Path,
        name: &str,
    ) -> Result<DownloadOutcome, ScrapeError> {
        let target = dir.join(name);
        if resource_exists(&target) {
            debug!("{} exists, skipping", target.display());
            return Ok(DownloadOutcome::Skipped);
        }

        let bytes = self
            .stream_to_file(url, &target)
            .await
            .map_err(|source| ScrapeError::Download {
                url: url.to_string(),
                path: target.clone(),
                source,
            })?;

        debug!("Saved {} ({} bytes)", target.display(), bytes);
        Ok(DownloadOutcome::Saved { bytes })
    }

    async fn stream_to_file(&self, url: &str, target: &Path) -> Result<u64> {
        let mut response = self
            .client
            .get(url)
            .send()
            .await
            .context("Request failed")?
            .error_for_status()?;

        let partial = partial_path(target);
        let mut file = File::create(&partial)
            .await
            .with_context(|| format!("Cannot create {}", partial.display()))?;

        let mut written = 0u64;
        while let Some(chunk) = response.chunk().await.context("Body stream failed")? {
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }
        file.flush().await?;
        drop(file);

        fs::rename(&partial, target).await?;
        Ok(written)
    }

    /// Download every job concurrently, one task per image.
    ///
    /// The first failure aborts the downloads still in flight and is returned;
    /// images already written stay on disk.
    pub async fn download_batch(&self, jobs: Vec<ImageJob>) -> Result<BatchSummary, ScrapeError> {
        let mut tasks = JoinSet::new();
        for job in jobs {
            let downloader = self.clone();
            tasks.spawn(async move {
                downloader
                    .download_image(&job.url, &job.dir, &job.file_name)
                    .await
            });
        }

        let mut summary = BatchSummary::default();
        while let Some(joined) = tasks.join_next().await {
            let outcome = match joined {
                Ok(result) => result,
                Err(join_error) => Err(ScrapeError::Task(join_error)),
            };

            match outcome {
                Ok(DownloadOutcome::Saved { .. }) => summary.saved += 1,
                Ok(DownloadOutcome::Skipped) => summary.skipped += 1,
                Err(e) => {
                    warn!("Aborting {} remaining download(s)", tasks.len());
                    tasks.abort_all();
                    return Err(e);
                }
            }
        }

        Ok(summary)
    }
}

fn partial_path(target: &Path) -> PathBuf {
    let mut name = target.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    target.with_file_name(name)
}
