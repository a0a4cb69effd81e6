//! Text extraction from rendered search pages.
//!
//! Everything markup-specific lives here: rendered page text goes in, a
//! structured quote or an [`ExtractionError`] comes out. Prices are taken at
//! face value.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

static PRICE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s?(\d{1,3}(?:,\d{3})+|\d+)(?:\.\d{2})?").unwrap());

static RATING_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(?:rated\s+([0-5]\.\d))|(?:\b([0-5]\.\d)\s*(?:/\s*5\b|out of 5|stars?|★))")
        .unwrap()
});

static BLOCK_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Elements that hold one hotel listing on a results page.
pub const CARD_SELECTOR: &str = "article, [data-testid=\"property-card\"]";

/// Page text in the shape the hotel extractor expects: one blank-line
/// separated block per listing card, or the body text when the page has no
/// cards.
pub fn listing_text(cards: &[String], body: &str) -> String {
    let blocks: Vec<&str> = cards
        .iter()
        .map(|card| card.trim())
        .filter(|card| !card.is_empty())
        .collect();
    if blocks.is_empty() {
        body.to_string()
    } else {
        blocks.join("\n\n")
    }
}

/// Why a page produced no quote.
#[derive(Debug, PartialEq)]
pub enum ExtractionError {
    /// No `$` price token anywhere in the page text.
    NoPrice,
    /// No listing block with both a name and a price.
    NoListings,
}

impl fmt::Display for ExtractionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionError::NoPrice => write!(f, "no price found in page text"),
            ExtractionError::NoListings => write!(f, "no hotel listings found in page text"),
        }
    }
}

impl std::error::Error for ExtractionError {}

/// A hotel listing pulled from one block of page text.
#[derive(Debug, Clone, PartialEq)]
pub struct HotelQuote {
    pub name: String,
    pub price: u32,
    pub rating: Option<f32>,
}

/// Every dollar amount in `text`, in order of appearance.
pub fn price_tokens(text: &str) -> Vec<u32> {
    PRICE_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .filter_map(|m| m.as_str().replace(',', "").parse::<u32>().ok())
        .collect()
}

/// First rating out of 5 mentioned in `text`.
pub fn rating_token(text: &str) -> Option<f32> {
    RATING_RE.captures(text).and_then(|caps| {
        caps.get(1)
            .or_else(|| caps.get(2))
            .and_then(|m| m.as_str().parse::<f32>().ok())
    })
}

/// The cheapest positive fare on a flight results page.
pub fn extract_flight_quote(text: &str) -> Result<u32, ExtractionError> {
    price_tokens(text)
        .into_iter()
        .filter(|&p| p > 0)
        .min()
        .ok_or(ExtractionError::NoPrice)
}

fn is_plain_line(line: &str) -> bool {
    !line.is_empty() && !PRICE_RE.is_match(line) && rating_token(line).is_none()
}

/// A block becomes a listing when it has a price; its name is the first line
/// that is neither a price nor a rating.
fn quote_from_block(block: &str) -> Option<HotelQuote> {
    let price = price_tokens(block).into_iter().find(|&p| p > 0)?;
    let name = block.lines().map(str::trim).find(|line| is_plain_line(line))?;
    Some(HotelQuote {
        name: name.to_string(),
        price,
        rating: rating_token(block),
    })
}

/// Listings from text with no blank lines between them.
///
/// Each price line closes a listing named by the last plain line before it.
/// A price line with no name since the previous listing is skipped.
fn quotes_from_run(text: &str) -> Vec<HotelQuote> {
    let mut quotes = Vec::new();
    let mut name: Option<&str> = None;
    let mut rating: Option<f32> = None;

    for line in text.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if PRICE_RE.is_match(line) {
            let price = price_tokens(line).into_iter().find(|&p| p > 0);
            if let (Some(name), Some(price)) = (name.take(), price) {
                quotes.push(HotelQuote {
                    name: name.to_string(),
                    price,
                    rating,
                });
            }
            rating = None;
        } else if let Some(r) = rating_token(line) {
            rating = Some(r);
        } else {
            name = Some(line);
        }
    }
    quotes
}

/// Hotel listings from a results page.
///
/// Text with blank-line separated blocks yields at most one listing per
/// block. Text without any blank lines is read as a run of listings, each
/// ending at its price line.
pub fn extract_hotel_quotes(text: &str) -> Result<Vec<HotelQuote>, ExtractionError> {
    let blocks: Vec<&str> = BLOCK_SPLIT_RE
        .split(text)
        .filter(|block| !block.trim().is_empty())
        .collect();

    let quotes: Vec<HotelQuote> = if blocks.len() > 1 {
        blocks.into_iter().filter_map(quote_from_block).collect()
    } else {
        quotes_from_run(text)
    };

    if quotes.is_empty() {
        Err(ExtractionError::NoListings)
    } else {
        Ok(quotes)
    }
}
