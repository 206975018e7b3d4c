//! Title page to on-disk mirror.
//!
//! validate → open session → manga name + chapters → first chapter →
//! per chapter: folder, navigate, prepare reader, enumerate pages, download.

use tracing::{info, warn};

use crate::discovery::{discover_chapters, read_manga_name};
use crate::download::{Downloader, ImageJob};
use crate::errors::ScrapeError;
use crate::mirror::{DirState, ensure_dir, image_file_name, is_single_component};
use crate::page::ReaderPage;
use crate::pagination::PageLinks;
use crate::reader::{confirm_age, open_first_chapter, prepare_reader_mode};
use crate::session::Session;
use crate::types::{BrowserOptions, Chapter, ChapterReport, CommandArgs, ScrapeConfig, ScrapeReport};

/// Run a full scrape in its own browser session.
///
/// The session is closed whether or not the scrape succeeds; a failure to
/// close is logged and never replaces the scrape's own result.
pub async fn run(args: &CommandArgs, options: &BrowserOptions) -> Result<ScrapeReport, ScrapeError> {
    let downloader = Downloader::new().map_err(ScrapeError::HttpClient)?;
    let session = Session::open(options).await?;

    let result = scrape(session.page(), &downloader, args).await;

    if let Err(e) = session.close().await {
        warn!("Session teardown failed: {:#}", e);
    }
    result
}

/// Mirror every chapter reachable from the title page onto disk
pub async fn scrape<P: ReaderPage>(
    page: &P,
    downloader: &Downloader,
    args: &CommandArgs,
) -> Result<ScrapeReport, ScrapeError> {
    page.goto(&args.manga_title_page).await?;

    let manga_name = read_manga_name(page).await?;
    info!("Scraping '{}'", manga_name);

    let chapters = discover_chapters(page).await?;
    let config = ScrapeConfig::new(manga_name, chapters, &args.manga_title_page, &args.save_path)?;
    ensure_dir(&config.manga_dir())?;

    if config.chapters.is_empty() {
        info!("No chapters found, nothing to download");
        return Ok(ScrapeReport {
            manga_name: config.manga_name,
            chapters: Vec::new(),
        });
    }

    open_first_chapter(page).await?;
    scrape_chapters(page, downloader, &config).await
}

/// Visit the configured chapters in order; the first failure stops the run
pub async fn scrape_chapters<P: ReaderPage>(
    page: &P,
    downloader: &Downloader,
    config: &ScrapeConfig,
) -> Result<ScrapeReport, ScrapeError> {
    let mut report = ScrapeReport {
        manga_name: config.manga_name.clone(),
        chapters: Vec::with_capacity(config.chapters.len()),
    };

    for (index, chapter) in config.chapters.iter().enumerate() {
        info!(
            "[{}/{}] {}",
            index + 1,
            config.chapters.len(),
            chapter.title
        );
        let chapter_report = scrape_chapter(page, downloader, config, chapter).await?;
        info!(
            "{}: {} page(s), {} saved, {} already present",
            chapter_report.title, chapter_report.pages, chapter_report.saved, chapter_report.skipped
        );
        report.chapters.push(chapter_report);
    }

    info!(
        "Finished '{}': {} image(s) saved, {} skipped",
        report.manga_name,
        report.images_saved(),
        report.images_skipped()
    );
    Ok(report)
}

async fn scrape_chapter<P: ReaderPage>(
    page: &P,
    downloader: &Downloader,
    config: &ScrapeConfig,
    chapter: &Chapter,
) -> Result<ChapterReport, ScrapeError> {
    if !is_single_component(&chapter.title) {
        warn!(
            "Chapter title '{}' is not a plain folder name; pages go to {}",
            chapter.title,
            config.chapter_dir(chapter).display()
        );
    }
    let chapter_dir = config.chapter_dir(chapter);
    if ensure_dir(&chapter_dir)? == DirState::Existing {
        info!("Folder '{}' exists, fetching missing pages only", chapter.title);
    }

    let chapter_url = config.chapter_url(chapter)?;
    page.goto(chapter_url.as_str()).await?;
    confirm_age(page).await?;
    prepare_reader_mode(page).await?;

    let links = PageLinks::open(page).await?.collect().await?;
    let jobs: Vec<ImageJob> = links
        .into_iter()
        .enumerate()
        .map(|(position, url)| ImageJob {
            url,
            dir: chapter_dir.clone(),
            file_name: image_file_name(position),
        })
        .collect();
    let pages = jobs.len();

    let summary = downloader.download_batch(jobs).await?;

    Ok(ChapterReport {
        title: chapter.title.clone(),
        pages,
        saved: summary.saved,
        skipped: summary.skipped,
    })
}
