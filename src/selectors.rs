//! CSS selectors for the readmanga / mintmanga reader markup

/// Root content container present on every page
pub const ROOT_CONTAINER: &str = "#mangaBox";
/// Manga title on the title page
pub const MANGA_NAME: &str = ".name";
/// "Read first chapter" button on the title page
pub const READ_FIRST_CHAPTER: &str = ".read-first-chapter";
/// Every chapter link, newest first in DOM order
pub const CHAPTER_LINK: &str = ".mobile-chapters-list .item-row a";
/// Currently displayed page image
pub const MANGA_IMG: &str = ".manga-img";

pub const READER_SETTINGS_BUTTON: &str = ".resize.btn";
pub const READER_SETTINGS_MODAL: &str = "#reader-settings-modal";
pub const READER_SETTINGS_MODAL_CLOSE_BUTTON: &str = "#reader-settings-modal .close";
pub const READER_SETTINGS_BUTTON_GROUP: &str = ".reader-mode";
/// Single-page ("standard") reading mode radio input
pub const READER_READING_STANDARD_MODE: &str = "input[value=\"standard\"]";
/// Matches only while single-page mode is the active setting
pub const READER_STANDARD_MODE_ACTIVE: &str = ".reader-mode .active input[value=\"standard\"]";

/// Page selector dropdown; one option per page
pub const PAGE: &str = ".page-selector";
pub const PAGE_OPTION: &str = ".page-selector option";
pub const NEXT_PAGE_BUTTON: &str = ".nextButton";

/// Accept control of the adult-content interstitial
pub const AGE_CONFIRM_BUTTON: &str = ".chapter-link.proxyFragment.manga-mtr";

/// Host fragments of the supported services
pub const MANGA_SERVICES: [&str; 2] = ["readmanga", "mintmanga"];
