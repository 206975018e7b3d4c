//! Title-page reads: manga name and chapter list

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::page::{LinkEntry, ReaderPage, Visibility};
use crate::selectors::{CHAPTER_LINK, MANGA_NAME};
use crate::types::Chapter;

/// Drop literal `\n` escape sequences and surrounding whitespace
pub fn sanitize_title(raw: &str) -> String {
    raw.replace("\\n", "").trim().to_string()
}

/// Turn raw DOM links (newest first) into chapters in reading order
pub fn chapters_from_entries(entries: Vec<LinkEntry>) -> Vec<Chapter> {
    let mut chapters: Vec<Chapter> = entries
        .into_iter()
        .filter_map(|entry| match entry.href {
            Some(link) => Some(Chapter {
                link,
                title: sanitize_title(&entry.text),
            }),
            None => {
                warn!("Skipping chapter link without href: {:?}", entry.text.trim());
                None
            }
        })
        .collect();

    chapters.reverse();
    chapters
}

/// Manga name shown on the title page, trimmed
pub async fn read_manga_name<P: ReaderPage>(page: &P) -> Result<String> {
    page.wait_for(MANGA_NAME, Visibility::Present).await?;
    let name = page.text_content(MANGA_NAME).await?.trim().to_string();

    if name.is_empty() {
        anyhow::bail!("Manga name element '{}' is empty", MANGA_NAME);
    }
    Ok(name)
}

/// All chapters linked from the loaded page, oldest first.
///
/// No chapter links is not an error; the result is simply empty.
pub async fn discover_chapters<P: ReaderPage>(page: &P) -> Result<Vec<Chapter>> {
    let entries = page.link_entries(CHAPTER_LINK).await?;
    debug!("Found {} chapter link(s)", entries.len());

    let chapters = chapters_from_entries(entries);
    info!("Discovered {} chapter(s)", chapters.len());
    Ok(chapters)
}
