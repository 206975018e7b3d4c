use std::path::PathBuf;

use thiserror::Error;

/// A rejected command-line argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The title page does not belong to readmanga or mintmanga
    #[error("Incorrect manga service please use readmanga or mintmanga")]
    InvalidMangaService,
    /// The destination folder does not exist
    #[error("Incorrect destination folder please use an existing absolute path")]
    InvalidDestinationFolder,
    /// The title page cannot be parsed as a URL
    #[error("Incorrect manga title page please use a full URL")]
    InvalidUrl,
}

impl ValidationError {
    /// Stable identifier printed next to the message
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidMangaService => "INVALID_MANGA_SERVICE",
            ValidationError::InvalidDestinationFolder => "INVALID_DESTINATION_FOLDER",
            ValidationError::InvalidUrl => "INVALID_URL",
        }
    }
}

/// Error type for a scrape run, carrying its exit code
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Arguments rejected before any browser work (exit code 2)
    #[error("{}", describe_validation(.0))]
    Validation(Vec<ValidationError>),
    /// Browser navigation, selector wait or DOM query failed (exit code 3)
    #[error("Navigation failed: {0:#}")]
    Navigation(#[source] anyhow::Error),
    /// An image could not be fetched or written (exit code 4)
    #[error("Failed to download {url} into {}: {source:#}", path.display())]
    Download {
        url: String,
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
    /// Mirror directory could not be created (exit code 1)
    #[error("Cannot create {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The HTTP client for image downloads could not be built (exit code 1)
    #[error("Cannot build HTTP client: {0:#}")]
    HttpClient(#[source] anyhow::Error),
    /// A download task panicked or was cancelled (exit code 1)
    #[error("Download task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ScrapeError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScrapeError::Validation(_) => 2,
            ScrapeError::Navigation(_) => 3,
            ScrapeError::Download { .. } => 4,
            ScrapeError::HttpClient(_) | ScrapeError::Io { .. } | ScrapeError::Task(_) => 1,
        }
    }
}

// Anyhow errors raised inside the pipeline come from the browser page
impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        ScrapeError::Navigation(err)
    }
}

impl From<Vec<ValidationError>> for ScrapeError {
    fn from(errors: Vec<ValidationError>) -> Self {
        ScrapeError::Validation(errors)
    }
}

fn describe_validation(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.code(), e))
        .collect::<Vec<_>>()
        .join("; ")
}
