//! On-disk mirror of `<save>/<manga>/<chapter>/<n>.jpeg`.
//!
//! Existence of a path is the only idempotence marker: an existing folder or
//! image is treated as already downloaded.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::errors::ScrapeError;

/// Whether a folder or file is already present
pub fn resource_exists(path: &Path) -> bool {
    path.exists()
}

/// Outcome of [`ensure_dir`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirState {
    Created,
    Existing,
}

/// Create a folder unless it already exists. Contents are never inspected.
pub fn ensure_dir(path: &Path) -> Result<DirState, ScrapeError> {
    if resource_exists(path) {
        debug!("{} exists, skipping creation", path.display());
        return Ok(DirState::Existing);
    }

    fs::create_dir_all(path).map_err(|source| ScrapeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Created {}", path.display());
    Ok(DirState::Created)
}

/// Whether a title names exactly one folder directly under its parent
pub fn is_single_component(name: &str) -> bool {
    !(name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']))
}

/// File name of the page at a zero-based position
pub fn image_file_name(index: usize) -> String {
    format!("{}.jpeg", index + 1)
}
