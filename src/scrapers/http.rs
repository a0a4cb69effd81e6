//! Plain HTTP page source.
//!
//! Fetches static markup with `reqwest` and flattens it to text with `scraper`.
//! Listing cards (`article`, property cards) become blank-line separated
//! blocks so the hotel extractor sees the same shape a browser would give it.

use super::extract::{listing_text, CARD_SELECTOR};
use super::{PageSource, ScrapeSettings};
use reqwest::Client;
use scraper::{ElementRef, Html, Selector};
use std::error::Error;
use tracing::{debug, instrument, warn};

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new(settings: &ScrapeSettings) -> Result<Self, Box<dyn Error>> {
        let client = Client::builder()
            .timeout(settings.nav_timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }
}

fn element_lines(element: ElementRef<'_>) -> Vec<String> {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Visible text of an HTML document, one block per listing card.
pub fn document_text(html: &str) -> Result<String, Box<dyn Error>> {
    let document = Html::parse_document(html);
    let card_selector = Selector::parse(CARD_SELECTOR)?;
    let body_selector = Selector::parse("body")?;

    let cards: Vec<String> = document
        .select(&card_selector)
        .map(|card| element_lines(card).join("\n"))
        .collect();
    let body = document
        .select(&body_selector)
        .next()
        .map(|body| element_lines(body).join("\n"))
        .unwrap_or_default();

    Ok(listing_text(&cards, &body))
}

impl PageSource for HttpSource {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn page_text(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            warn!(status = %response.status(), "Search page returned an error status");
            return Err(format!("{} returned {}", url, response.status()).into());
        }
        let html = response.text().await?;
        debug!(bytes = html.len(), "Downloaded search page");
        document_text(&html)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_text_uses_cards_as_blocks() {
        let html = r#"<html><body>
            <h1>Results</h1>
            <article><h3>The Palms</h3><span>Rated 4.5</span><span>$129</span></article>
            <article><h3>Ocean Inn</h3><span>$99</span></article>
        </body></html>"#;
        let text = document_text(html).unwrap();
        assert_eq!(text, "The Palms\nRated 4.5\n$129\n\nOcean Inn\n$99");
    }

    #[test]
    fn test_document_text_falls_back_to_body() {
        let html = "<html><body><p>Cheapest</p><p>$389</p></body></html>";
        assert_eq!(document_text(html).unwrap(), "Cheapest\n$389");
    }
}
