// Common test utilities and fixtures
#![allow(dead_code)]

use anyhow::Result;
use axum::Router;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use rmanga_scraper::selectors::*;
use rmanga_scraper::{LinkEntry, ReaderPage, Visibility};
use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Barrier;

/// Something the fake page was asked to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Goto(String),
    Reload,
    Click(String),
}

/// A chapter as the fake site renders it
#[derive(Debug, Clone)]
pub struct FakeChapter {
    pub href: String,
    pub text: String,
    pub images: Vec<String>,
}

/// Scripted readmanga-like site
#[derive(Debug, Clone)]
pub struct FakeSite {
    pub title_page: String,
    pub manga_name: String,
    /// DOM order: newest first
    pub chapters: Vec<FakeChapter>,
    pub single_page_active: bool,
    pub age_gate: bool,
    /// The age gate comes back on every navigation
    pub age_gate_every_visit: bool,
}

#[derive(Debug, Default)]
struct PageState {
    url: String,
    page_index: usize,
    single_page: bool,
    modal_open: bool,
    age_accepted: bool,
    events: Vec<Event>,
}

/// In-memory page that behaves like the reader markup
pub struct FakePage {
    site: FakeSite,
    state: Mutex<PageState>,
}

impl FakePage {
    pub fn new(site: FakeSite) -> Self {
        let state = PageState {
            single_page: site.single_page_active,
            ..PageState::default()
        };
        FakePage {
            site,
            state: Mutex::new(state),
        }
    }

    /// Start on an already loaded chapter
    pub fn on_chapter(site: FakeSite, chapter: usize) -> Self {
        let page = FakePage::new(site);
        let url = page.chapter_url(&page.site.chapters[chapter]);
        page.state.lock().unwrap().url = url;
        page
    }

    pub fn events(&self) -> Vec<Event> {
        self.state.lock().unwrap().events.clone()
    }

    pub fn clicks(&self, selector: &str) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == Event::Click(selector.to_string()))
            .count()
    }

    pub fn reloads(&self) -> usize {
        self.events().iter().filter(|e| **e == Event::Reload).count()
    }

    pub fn visited(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Goto(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn modal_open(&self) -> bool {
        self.state.lock().unwrap().modal_open
    }

    pub fn single_page(&self) -> bool {
        self.state.lock().unwrap().single_page
    }

    fn chapter_url(&self, chapter: &FakeChapter) -> String {
        let origin = url::Url::parse(&self.site.title_page).unwrap();
        origin.join(&chapter.href).unwrap().to_string()
    }

    fn current_chapter(&self, state: &PageState) -> Option<&FakeChapter> {
        self.site
            .chapters
            .iter()
            .find(|c| self.chapter_url(c) == state.url)
    }

    /// (present, visible) for a selector in the current state
    fn element(&self, state: &PageState, selector: &str) -> (bool, bool) {
        let on_title = state.url == self.site.title_page;
        let on_chapter = self.current_chapter(state).is_some();
        let gated = on_chapter && self.site.age_gate && !state.age_accepted;

        let present = match selector {
            ROOT_CONTAINER => on_title || on_chapter,
            MANGA_NAME | READ_FIRST_CHAPTER | CHAPTER_LINK => on_title,
            AGE_CONFIRM_BUTTON => gated,
            READER_SETTINGS_BUTTON | PAGE | PAGE_OPTION | NEXT_PAGE_BUTTON | MANGA_IMG => {
                on_chapter && !gated
            }
            READER_STANDARD_MODE_ACTIVE => on_chapter && state.single_page,
            READER_SETTINGS_MODAL | READER_SETTINGS_MODAL_CLOSE_BUTTON => on_chapter,
            READER_SETTINGS_BUTTON_GROUP | READER_READING_STANDARD_MODE => state.modal_open,
            _ => false,
        };

        let visible = match selector {
            READER_SETTINGS_MODAL | READER_SETTINGS_MODAL_CLOSE_BUTTON => {
                present && state.modal_open
            }
            _ => present,
        };

        (present, visible)
    }
}

impl ReaderPage for FakePage {
    async fn goto(&self, url: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Goto(url.to_string()));
        state.url = url.to_string();
        state.page_index = 0;
        state.modal_open = false;
        if self.site.age_gate_every_visit {
            state.age_accepted = false;
        }
        Ok(())
    }

    async fn reload(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.events.push(Event::Reload);
        state.page_index = 0;
        state.modal_open = false;
        Ok(())
    }

    async fn current_url(&self) -> Result<String> {
        Ok(self.state.lock().unwrap().url.clone())
    }

    async fn wait_for(&self, selector: &str, visibility: Visibility) -> Result<()> {
        let state = self.state.lock().unwrap();
        let (present, visible) = self.element(&state, selector);
        let satisfied = match visibility {
            Visibility::Present => present,
            Visibility::Visible => visible,
            Visibility::Hidden => !visible,
        };
        if !satisfied {
            anyhow::bail!(
                "Operation timed out waiting for '{}' to be {}",
                selector,
                visibility
            );
        }
        Ok(())
    }

    async fn exists(&self, selector: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.element(&state, selector).0)
    }

    async fn is_visible(&self, selector: &str) -> Result<bool> {
        let state = self.state.lock().unwrap();
        Ok(self.element(&state, selector).1)
    }

    async fn click(&self, selector: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if !self.element(&state, selector).0 {
            anyhow::bail!("Element not found: {}", selector);
        }
        state.events.push(Event::Click(selector.to_string()));

        match selector {
            READER_SETTINGS_BUTTON => state.modal_open = true,
            READER_READING_STANDARD_MODE => state.single_page = true,
            READER_SETTINGS_MODAL_CLOSE_BUTTON => state.modal_open = false,
            AGE_CONFIRM_BUTTON => state.age_accepted = true,
            NEXT_PAGE_BUTTON => state.page_index += 1,
            READ_FIRST_CHAPTER => {
                let first = self.site.chapters.last().expect("site has chapters");
                state.url = self.chapter_url(first);
                state.page_index = 0;
            }
            _ => {}
        }
        Ok(())
    }

    async fn text_content(&self, selector: &str) -> Result<String> {
        let state = self.state.lock().unwrap();
        match selector {
            MANGA_NAME if self.element(&state, selector).0 => {
                Ok(format!("\n  {}  \n", self.site.manga_name))
            }
            _ => anyhow::bail!("No elements found matching selector: {}", selector),
        }
    }

    async fn attribute(&self, selector: &str, name: &str) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if selector != MANGA_IMG || name != "src" || !self.element(&state, selector).0 {
            anyhow::bail!("Element not found: {}", selector);
        }
        let chapter = self.current_chapter(&state).expect("on a chapter");
        Ok(chapter.images.get(state.page_index).cloned())
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        let state = self.state.lock().unwrap();
        match selector {
            PAGE_OPTION => Ok(self
                .current_chapter(&state)
                .map(|c| c.images.len())
                .unwrap_or(0)),
            _ => Ok(usize::from(self.element(&state, selector).0)),
        }
    }

    async fn link_entries(&self, selector: &str) -> Result<Vec<LinkEntry>> {
        let state = self.state.lock().unwrap();
        if selector != CHAPTER_LINK || !self.element(&state, selector).0 {
            return Ok(Vec::new());
        }
        Ok(self
            .site
            .chapters
            .iter()
            .map(|c| LinkEntry {
                href: Some(c.href.clone()),
                text: c.text.clone(),
            })
            .collect())
    }
}

/// Site with `chapters` chapters of `pages` pages, images under `image_base`
pub fn fake_site(image_base: &str, chapters: usize, pages: usize) -> FakeSite {
    // Newest first, like the real chapter list
    let chapters = (1..=chapters)
        .rev()
        .map(|n| FakeChapter {
            href: format!("/berserk/vol1/{}", n),
            text: format!("\\n  Berserk 1 - {}\\n ", n),
            images: (1..=pages)
                .map(|p| format!("{}/img/ch{}/p{}.jpg", image_base, n, p))
                .collect(),
        })
        .collect();

    FakeSite {
        title_page: "https://readmanga.live/berserk".to_string(),
        manga_name: "Berserk".to_string(),
        chapters,
        single_page_active: false,
        age_gate: false,
        age_gate_every_visit: false,
    }
}

/// Shared state of the local image server
#[derive(Default)]
pub struct ImageServerState {
    pub hits: AtomicUsize,
    pub paths: Mutex<Vec<String>>,
    /// When set, every request waits for this many concurrent requests
    pub barrier: Option<Barrier>,
    pub failing: Mutex<HashSet<String>>,
}

impl ImageServerState {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn paths(&self) -> Vec<String> {
        let mut paths = self.paths.lock().unwrap().clone();
        paths.sort();
        paths
    }
}

pub struct ImageServer {
    pub base_url: String,
    pub state: Arc<ImageServerState>,
}

async fn serve_image(
    State(state): State<Arc<ImageServerState>>,
    Path(path): Path<String>,
) -> Result<Vec<u8>, StatusCode> {
    state.hits.fetch_add(1, Ordering::SeqCst);
    state.paths.lock().unwrap().push(path.clone());

    if let Some(barrier) = &state.barrier
        && tokio::time::timeout(Duration::from_secs(10), barrier.wait())
            .await
            .is_err()
    {
        // Requests were not issued concurrently
        return Err(StatusCode::REQUEST_TIMEOUT);
    }

    if state.failing.lock().unwrap().contains(&path) {
        return Err(StatusCode::NOT_FOUND);
    }

    Ok(format!("image:{}", path).into_bytes())
}

/// Start an image server on a free local port
pub async fn start_image_server(state: ImageServerState) -> ImageServer {
    let state = Arc::new(state);
    let app = Router::new()
        .route("/img/*path", get(serve_image))
        .with_state(state.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind image server");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("Image server failed");
    });

    ImageServer {
        base_url: format!("http://{}", addr),
        state,
    }
}
