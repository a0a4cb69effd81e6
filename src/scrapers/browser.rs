//! Headless Chrome page source.
//!
//! Result pages on the big travel sites render prices client-side, so the
//! default source drives a real browser: one tab per page, a fixed navigation
//! timeout, a fixed settle delay, then the text of each listing card (or the
//! whole body when the page has no cards).

use super::extract::{listing_text, CARD_SELECTOR};
use super::{PageSource, ScrapeSettings};
use headless_chrome::{Browser, LaunchOptions, Tab};
use serde::Deserialize;
use std::error::Error;
use std::time::Duration;
use tracing::{debug, info, instrument};

type SendError = Box<dyn Error + Send + Sync>;

pub struct BrowserSource {
    browser: Browser,
    nav_timeout: Duration,
    settle: Duration,
}

/// What the in-page script reports back.
#[derive(Debug, Default, Deserialize)]
struct PageDump {
    #[serde(default)]
    cards: Vec<String>,
    #[serde(default)]
    body: String,
}

/// How long the browser connection may sit idle: the longest gap between
/// two page reads, doubled.
fn idle_timeout(settings: &ScrapeSettings) -> Duration {
    let cycle = settings.delay
        + Duration::from_millis(settings.jitter_ms)
        + settings.nav_timeout
        + settings.settle;
    cycle * 2
}

/// Script returning the card texts and body text as a JSON string.
fn dump_script() -> Result<String, serde_json::Error> {
    let selector = serde_json::to_string(CARD_SELECTOR)?;
    Ok(format!(
        "JSON.stringify({{ \
            cards: Array.from(document.querySelectorAll({})).map(el => el.innerText || ''), \
            body: document.body ? document.body.innerText : '' \
        }})",
        selector
    ))
}

impl BrowserSource {
    /// Launch a headless Chrome instance.
    pub fn new(settings: &ScrapeSettings) -> Result<Self, Box<dyn Error>> {
        let idle = idle_timeout(settings);
        info!(?idle, "Launching headless Chrome");
        let options = LaunchOptions::default_builder()
            .headless(true)
            .idle_browser_timeout(idle)
            .build()?;
        let browser = Browser::new(options)?;

        Ok(Self {
            browser,
            nav_timeout: settings.nav_timeout,
            settle: settings.settle,
        })
    }
}

fn read_tab(tab: &Tab, url: &str, nav_timeout: Duration, settle: Duration) -> Result<String, SendError> {
    tab.set_default_timeout(nav_timeout);
    tab.navigate_to(url)?;
    tab.wait_until_navigated()?;

    std::thread::sleep(settle);

    let raw = tab
        .evaluate(&dump_script()?, false)?
        .value
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_default();
    let dump: PageDump = if raw.is_empty() {
        PageDump::default()
    } else {
        serde_json::from_str(&raw)?
    };
    debug!(cards = dump.cards.len(), "Read page cards");
    Ok(listing_text(&dump.cards, &dump.body))
}

/// Open `url` in a fresh tab and read its text. Blocking.
///
/// The tab is closed whether or not the page loaded.
fn load_text(
    browser: &Browser,
    url: &str,
    nav_timeout: Duration,
    settle: Duration,
) -> Result<String, SendError> {
    let tab = browser.new_tab()?;
    read_then_close(
        &tab,
        |tab| read_tab(tab, url, nav_timeout, settle),
        |tab| {
            if let Err(e) = tab.close(true) {
                debug!(error = %e, "Failed to close tab");
            }
        },
    )
}

/// Run `read` on `tab`, then `close` it, whatever `read` returned.
fn read_then_close<T, R>(tab: &T, read: impl FnOnce(&T) -> R, close: impl FnOnce(&T)) -> R {
    let result = read(tab);
    close(tab);
    result
}

impl PageSource for BrowserSource {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn page_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let browser = self.browser.clone();
        let owned_url = url.to_string();
        let (nav_timeout, settle) = (self.nav_timeout, self.settle);

        let text = tokio::task::spawn_blocking(move || {
            load_text(&browser, &owned_url, nav_timeout, settle)
        })
        .await?
        .map_err(|e| e as Box<dyn Error>)?;

        debug!(bytes = text.len(), "Read rendered page text");
        Ok(text)
    }
}
