//! Travel-site scrapers for flight fares and hotel rates.
//!
//! Scraping is split in two so the brittle half can be swapped out:
//!
//! 1. **Loading**: a [`PageSource`] turns a search URL into rendered page text
//! 2. **Extraction**: [`extract`] turns that text into quotes or an explicit failure
//!
//! # Sources
//!
//! | Source | Module | Notes |
//! |--------|--------|-------|
//! | Headless Chrome | [`browser`] | Renders JavaScript-heavy result pages |
//! | Plain HTTP | [`http`] | Static markup only; useful for local testing |
//!
//! The [`flights`] and [`hotels`] modules walk the day's rotation one page at
//! a time with a polite delay between navigations. A failed page is logged and
//! skipped.

pub mod browser;
pub mod extract;
pub mod flights;
pub mod hotels;
pub mod http;

use clap::ValueEnum;
use std::error::Error;
use std::time::Duration;

pub use browser::BrowserSource;
pub use http::HttpSource;

/// Anything that can load a URL and hand back its visible text.
pub trait PageSource {
    async fn page_text(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// How pages are loaded.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum FetchMode {
    Browser,
    Http,
}

/// Pacing and timeouts shared by every scraper.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrapeSettings {
    /// Fixed pause between navigations.
    pub delay: Duration,
    /// Upper bound of the random jitter added to `delay`, in milliseconds.
    pub jitter_ms: u64,
    /// Per-navigation timeout.
    pub nav_timeout: Duration,
    /// Wait after navigation before reading the page.
    pub settle: Duration,
}

impl Default for ScrapeSettings {
    fn default() -> Self {
        Self {
            delay: Duration::from_secs(5),
            jitter_ms: 3000,
            nav_timeout: Duration::from_secs(30),
            settle: Duration::from_secs(4),
        }
    }
}

/// The page source chosen on the command line.
pub enum Fetcher {
    Browser(BrowserSource),
    Http(HttpSource),
}

impl Fetcher {
    pub fn new(mode: FetchMode, settings: &ScrapeSettings) -> Result<Self, Box<dyn Error>> {
        Ok(match mode {
            FetchMode::Browser => Fetcher::Browser(BrowserSource::new(settings)?),
            FetchMode::Http => Fetcher::Http(HttpSource::new(settings)?),
        })
    }
}

impl PageSource for Fetcher {
    async fn page_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        match self {
            Fetcher::Browser(source) => source.page_text(url).await,
            Fetcher::Http(source) => source.page_text(url).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::PageSource;
    use std::error::Error;
    use std::sync::Mutex;

    /// Serves canned text per URL substring and records every request.
    #[derive(Default)]
    pub struct FakeSource {
        pages: Vec<(String, String)>,
        pub requested: Mutex<Vec<String>>,
    }

    impl FakeSource {
        pub fn with_page(mut self, url_fragment: &str, text: &str) -> Self {
            self.pages.push((url_fragment.to_string(), text.to_string()));
            self
        }

        pub fn request_count(&self) -> usize {
            self.requested.lock().unwrap().len()
        }
    }

    impl PageSource for FakeSource {
        async fn page_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
            self.requested.lock().unwrap().push(url.to_string());
            self.pages
                .iter()
                .find(|(fragment, _)| url.contains(fragment.as_str()))
                .map(|(_, text)| text.clone())
                .ok_or_else(|| format!("navigation timed out: {}", url).into())
        }
    }
}
