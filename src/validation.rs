//! Command-line argument checks run before any browser work

use std::path::PathBuf;

use url::Url;

use crate::errors::ValidationError;
use crate::mirror::resource_exists;
use crate::selectors::MANGA_SERVICES;
use crate::types::CommandArgs;

/// Whether the URL mentions one of the supported services
pub fn is_supported_service(manga_title_page: &str) -> bool {
    MANGA_SERVICES
        .iter()
        .any(|service| manga_title_page.contains(service))
}

/// Validate both arguments independently and report every failure.
///
/// The values are returned unchanged on success.
pub fn validate_arguments(
    manga_title_page: &str,
    save_path: &str,
) -> Result<CommandArgs, Vec<ValidationError>> {
    let mut errors = Vec::new();

    if Url::parse(manga_title_page).is_err() {
        errors.push(ValidationError::InvalidUrl);
    }

    if !is_supported_service(manga_title_page) {
        errors.push(ValidationError::InvalidMangaService);
    }

    let save_path = PathBuf::from(save_path);
    if save_path.as_os_str().is_empty() || !resource_exists(&save_path) {
        errors.push(ValidationError::InvalidDestinationFolder);
    }

    if errors.is_empty() {
        Ok(CommandArgs {
            manga_title_page: manga_title_page.to_string(),
            save_path,
        })
    } else {
        Err(errors)
    }
}

#[cfg(test)]
#[path = "validation_test.rs"]
mod validation_test;
