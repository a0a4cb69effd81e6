//! Data models for scraped deals and generated blog posts.
//!
//! This module defines the core data structures used throughout the application:
//! - [`FlightDeal`] and [`HotelDeal`]: one scraped price record each
//! - [`Deal`]: the behaviour shared by both for dedup and ranking
//! - [`DealFile`]: the flat-file envelope written after every scrape
//! - [`Post`]: a rendered blog post ready for local output or publishing
//!
//! Deals carry no identity beyond their composite [`Deal::key`]. Nothing here
//! validates prices: a scraped `$1` fare is kept as-is.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Behaviour shared by flight and hotel deals.
pub trait Deal {
    /// Composite key used for deduplication within and across runs.
    fn key(&self) -> String;
    /// Discount relative to the typical price, in whole percent.
    fn percent_off(&self) -> i32;
    /// When the record was scraped.
    fn scraped_at(&self) -> DateTime<Utc>;
}

/// A round-trip fare found for one origin/destination pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightDeal {
    /// Origin airport code, e.g. `JFK`.
    pub origin: String,
    /// Origin city name.
    pub origin_name: String,
    /// Destination airport code, e.g. `LHR`.
    pub destination: String,
    /// Destination city name.
    pub destination_name: String,
    /// Scraped round-trip price in whole dollars.
    pub price: u32,
    /// Reference price the discount is measured against.
    pub typical_price: u32,
    pub percent_off: i32,
    /// Sample outbound date used for the search.
    pub depart_date: NaiveDate,
    /// Sample return date used for the search.
    pub return_date: NaiveDate,
    /// Affiliate booking link.
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

impl Deal for FlightDeal {
    fn key(&self) -> String {
        format!("{}-{}-{}", self.origin, self.destination, self.price)
    }

    fn percent_off(&self) -> i32 {
        self.percent_off
    }

    fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }
}

/// A nightly hotel rate found in one destination city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelDeal {
    /// Hotel name as it appeared in the listing.
    pub name: String,
    /// Destination city searched.
    pub location: String,
    /// Scraped nightly price in whole dollars.
    pub price: u32,
    pub typical_price: u32,
    pub percent_off: i32,
    /// Guest rating out of 5, when the listing showed one.
    pub rating: Option<f32>,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    /// Affiliate booking link.
    pub url: String,
    pub scraped_at: DateTime<Utc>,
}

impl Deal for HotelDeal {
    fn key(&self) -> String {
        format!("{}-{}-{}", self.name, self.location, self.price)
    }

    fn percent_off(&self) -> i32 {
        self.percent_off
    }

    fn scraped_at(&self) -> DateTime<Utc> {
        self.scraped_at
    }
}

/// Either kind of deal, tagged for the combined output file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnyDeal {
    Flight(FlightDeal),
    Hotel(HotelDeal),
}

/// Envelope written to every deals file.
///
/// ```json
/// { "generated": "2026-10-15T06:00:00Z", "count": 2, "deals": [ ... ] }
/// ```
#[derive(Debug, Serialize, Deserialize)]
pub struct DealFile<T> {
    pub generated: DateTime<Utc>,
    pub count: usize,
    pub deals: Vec<T>,
}

impl<T> DealFile<T> {
    pub fn new(deals: Vec<T>, generated: DateTime<Utc>) -> Self {
        Self {
            generated,
            count: deals.len(),
            deals,
        }
    }
}

/// A generated blog post.
///
/// The same record is written to disk in local-only mode and sent to the
/// posts endpoint when publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    /// Stable identifier used to find an existing post before updating it.
    pub slug: String,
    /// Rendered HTML body.
    pub content: String,
    /// Plain-text summary.
    pub excerpt: String,
    /// CMS category ids.
    pub categories: Vec<u64>,
    /// Tag names; resolved to ids by the publisher.
    pub tags: Vec<String>,
}

/// Percent discount of `current` against `typical`, rounded to the nearest
/// whole percent. Negative when the scraped price is above typical.
pub fn percent_off(typical: u32, current: u32) -> i32 {
    if typical == 0 {
        return 0;
    }
    let typical = f64::from(typical);
    ((typical - f64::from(current)) / typical * 100.0).round() as i32
}
