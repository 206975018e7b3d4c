//! Reader page preparation: age interstitial and single-page mode

use anyhow::Result;
use tracing::{debug, info};

use crate::page::{ReaderPage, Visibility};
use crate::selectors::{
    AGE_CONFIRM_BUTTON, READ_FIRST_CHAPTER, READER_READING_STANDARD_MODE,
    READER_SETTINGS_BUTTON, READER_SETTINGS_BUTTON_GROUP, READER_SETTINGS_MODAL,
    READER_SETTINGS_MODAL_CLOSE_BUTTON, READER_STANDARD_MODE_ACTIVE, ROOT_CONTAINER,
};

/// Which branch [`prepare_reader_mode`] took
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderMode {
    /// Single-page mode was already selected; nothing was clicked
    AlreadyActive,
    /// Single-page mode was selected and the page reloaded
    Switched,
}

/// Accept the age interstitial if it is showing. Returns whether it was.
pub async fn confirm_age<P: ReaderPage>(page: &P) -> Result<bool> {
    if page.exists(AGE_CONFIRM_BUTTON).await? {
        info!("Accepting age confirmation");
        page.click(AGE_CONFIRM_BUTTON).await?;
        return Ok(true);
    }
    Ok(false)
}

pub async fn wait_until_content_loaded<P: ReaderPage>(page: &P) -> Result<()> {
    page.wait_for(ROOT_CONTAINER, Visibility::Present).await
}

/// Leave the title page through "read first chapter", settling the
/// interstitial on the way.
pub async fn open_first_chapter<P: ReaderPage>(page: &P) -> Result<()> {
    page.click(READ_FIRST_CHAPTER).await?;
    wait_until_content_loaded(page).await?;
    confirm_age(page).await?;
    wait_until_content_loaded(page).await
}

/// Absence of the compound selector means "not active"
async fn is_single_page_mode_active<P: ReaderPage>(page: &P) -> Result<bool> {
    page.exists(READER_STANDARD_MODE_ACTIVE).await
}

/// Pick single-page mode in the settings modal and reload to apply it
async fn switch_to_single_page_mode<P: ReaderPage>(page: &P) -> Result<()> {
    info!("Switching reader to single-page mode");
    page.click(READER_SETTINGS_BUTTON).await?;
    page.wait_for(READER_SETTINGS_MODAL, Visibility::Visible).await?;
    page.wait_for(READER_SETTINGS_BUTTON_GROUP, Visibility::Visible).await?;
    page.wait_for(READER_READING_STANDARD_MODE, Visibility::Visible).await?;
    page.click(READER_READING_STANDARD_MODE).await?;
    page.reload().await
}

/// Close the settings modal if it is open. Returns whether it was.
pub async fn close_settings_modal<P: ReaderPage>(page: &P) -> Result<bool> {
    if !page.is_visible(READER_SETTINGS_MODAL).await? {
        return Ok(false);
    }

    debug!("Closing reader settings modal");
    page.click(READER_SETTINGS_MODAL_CLOSE_BUTTON).await?;
    page.wait_for(READER_SETTINGS_MODAL, Visibility::Hidden).await?;
    Ok(true)
}

/// Make sure the chapter renders one image per page.
///
/// The mode is a browser-profile preference, so once switched, later
/// chapters of the run take the `AlreadyActive` branch.
pub async fn prepare_reader_mode<P: ReaderPage>(page: &P) -> Result<ReaderMode> {
    page.wait_for(READER_SETTINGS_BUTTON, Visibility::Visible).await?;

    let mode = if is_single_page_mode_active(page).await? {
        debug!("Single-page mode already active");
        ReaderMode::AlreadyActive
    } else {
        switch_to_single_page_mode(page).await?;
        ReaderMode::Switched
    };

    wait_until_content_loaded(page).await?;
    // The interstitial can render after the content container
    confirm_age(page).await?;
    close_settings_modal(page).await?;

    Ok(mode)
}
