//! Affiliate booking links and the link-generator output formats.
//!
//! All links go through [`QueryBuilder`], which percent-encodes each value
//! exactly once. Values are never pre-encoded by callers.

use crate::registry::{Airport, Destination, FlightRotation, HotelDestination};
use chrono::NaiveDate;
use clap::ValueEnum;
use serde::Serialize;
use std::fmt::Write;

const FLIGHT_SEARCH_BASE: &str = "https://www.kayak.com/flights";
const HOTEL_SEARCH_BASE: &str = "https://www.booking.com/searchresults.html";

/// Builds `name=value` pairs joined by `&`, encoding only the values.
#[derive(Debug, Default)]
pub struct QueryBuilder {
    pairs: Vec<(&'static str, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn param(mut self, name: &'static str, value: impl AsRef<str>) -> Self {
        self.pairs
            .push((name, urlencoding::encode(value.as_ref()).into_owned()));
        self
    }

    /// Adds the pair only when `value` is present and non-empty.
    pub fn param_opt(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(v) if !v.is_empty() => self.param(name, v),
            _ => self,
        }
    }

    /// Append the query to `base` with a `?` separator.
    pub fn finish(self, base: &str) -> String {
        if self.pairs.is_empty() {
            return base.to_string();
        }
        let query = self
            .pairs
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&");
        format!("{}?{}", base, query)
    }
}

/// Partner identifiers appended to booking links.
#[derive(Debug, Clone, Default)]
pub struct AffiliateLinks {
    /// Flight partner tag (`affid`).
    pub flight_tag: Option<String>,
    /// Hotel partner publisher id (`aid`).
    pub hotel_publisher_id: Option<String>,
}

impl AffiliateLinks {
    fn flight_base(origin: &str, destination: &str, depart: NaiveDate, ret: NaiveDate) -> String {
        format!(
            "{}/{}-{}/{}/{}",
            FLIGHT_SEARCH_BASE,
            urlencoding::encode(origin),
            urlencoding::encode(destination),
            depart.format("%Y-%m-%d"),
            ret.format("%Y-%m-%d"),
        )
    }

    /// Search page the scraper loads for a round trip.
    pub fn flight_search_url(
        &self,
        origin: &str,
        destination: &str,
        depart: NaiveDate,
        ret: NaiveDate,
    ) -> String {
        QueryBuilder::new()
            .param("sort", "price_a")
            .finish(&Self::flight_base(origin, destination, depart, ret))
    }

    /// Search page annotated with the partner tag.
    pub fn flight_link(
        &self,
        origin: &str,
        destination: &str,
        depart: NaiveDate,
        ret: NaiveDate,
    ) -> String {
        QueryBuilder::new()
            .param("sort", "price_a")
            .param_opt("affid", self.flight_tag.as_deref())
            .finish(&Self::flight_base(origin, destination, depart, ret))
    }

    fn hotel_query(&self, city: &str, check_in: NaiveDate, check_out: NaiveDate) -> QueryBuilder {
        QueryBuilder::new()
            .param("ss", city)
            .param("checkin", check_in.format("%Y-%m-%d").to_string())
            .param("checkout", check_out.format("%Y-%m-%d").to_string())
            .param("group_adults", "2")
            .param("no_rooms", "1")
            .param("order", "price")
    }

    pub fn hotel_search_url(&self, city: &str, check_in: NaiveDate, check_out: NaiveDate) -> String {
        self.hotel_query(city, check_in, check_out)
            .finish(HOTEL_SEARCH_BASE)
    }

    pub fn hotel_link(&self, city: &str, check_in: NaiveDate, check_out: NaiveDate) -> String {
        self.hotel_query(city, check_in, check_out)
            .param_opt("aid", self.hotel_publisher_id.as_deref())
            .finish(HOTEL_SEARCH_BASE)
    }
}

/// Sample travel dates used for searches and links.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TravelDates {
    pub depart: NaiveDate,
    pub ret: NaiveDate,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl TravelDates {
    /// Flights leave three weeks out for a week; hotels are two nights two weeks out.
    pub fn from_today(today: NaiveDate) -> Self {
        let depart = today + chrono::Duration::days(21);
        let check_in = today + chrono::Duration::days(14);
        Self {
            depart,
            ret: depart + chrono::Duration::days(7),
            check_in,
            check_out: check_in + chrono::Duration::days(2),
        }
    }
}

/// Output format for the link generator.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum LinkFormat {
    Markdown,
    Html,
    Bligence,
    Json,
    List,
}

/// Which links the generator emits.
#[derive(Debug, Clone, Copy, PartialEq, ValueEnum)]
pub enum LinkKind {
    Flights,
    Hotels,
    All,
}

/// One generated link.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabeledLink {
    pub kind: &'static str,
    pub label: String,
    pub url: String,
}

pub fn flight_label(origin: &Airport, destination: &Destination) -> String {
    format!(
        "{} ({}) to {} ({})",
        origin.city, origin.code, destination.city, destination.code
    )
}

pub fn hotel_label(destination: &HotelDestination) -> String {
    format!("Hotels in {}", destination.city)
}

/// Links for every route and hotel city in a day's rotation, without scraping.
pub fn rotation_links(
    flights: &FlightRotation,
    hotels: &[HotelDestination],
    dates: TravelDates,
    links: &AffiliateLinks,
    kind: LinkKind,
) -> Vec<LabeledLink> {
    let mut out = Vec::new();
    if matches!(kind, LinkKind::Flights | LinkKind::All) {
        for (origin, destination) in flights.routes() {
            out.push(LabeledLink {
                kind: "flight",
                label: flight_label(&origin, &destination),
                url: links.flight_link(origin.code, destination.code, dates.depart, dates.ret),
            });
        }
    }
    if matches!(kind, LinkKind::Hotels | LinkKind::All) {
        for hotel in hotels {
            out.push(LabeledLink {
                kind: "hotel",
                label: hotel_label(hotel),
                url: links.hotel_link(hotel.city, dates.check_in, dates.check_out),
            });
        }
    }
    out
}

/// Render generated links in the requested format.
pub fn render_links(links: &[LabeledLink], format: LinkFormat) -> Result<String, serde_json::Error> {
    let mut out = String::new();
    match format {
        LinkFormat::Markdown => {
            for link in links {
                let _ = writeln!(out, "- [{}]({})", link.label, link.url);
            }
        }
        LinkFormat::Html => {
            out.push_str("<ul>\n");
            for link in links {
                let _ = writeln!(
                    out,
                    "  <li><a href=\"{}\" rel=\"nofollow sponsored\" target=\"_blank\">{}</a></li>",
                    crate::render::escape_html(&link.url),
                    crate::render::escape_html(&link.label)
                );
            }
            out.push_str("</ul>\n");
        }
        LinkFormat::Bligence => {
            for link in links {
                let _ = writeln!(out, "[affiliate url=\"{}\"]{}[/affiliate]", link.url, link.label);
            }
        }
        LinkFormat::Json => {
            out = serde_json::to_string_pretty(links)?;
            out.push('\n');
        }
        LinkFormat::List => {
            for link in links {
                let _ = writeln!(out, "{}", link.url);
            }
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{flight_rotation, hotel_rotation};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn links() -> AffiliateLinks {
        AffiliateLinks {
            flight_tag: Some("dealsblog-20".to_string()),
            hotel_publisher_id: Some("1234567".to_string()),
        }
    }

    #[test]
    fn test_flight_link_literal() {
        let url = links().flight_link("JFK", "LHR", date(2026, 11, 5), date(2026, 11, 12));
        assert_eq!(
            url,
            "https://www.kayak.com/flights/JFK-LHR/2026-11-05/2026-11-12?sort=price_a&affid=dealsblog-20"
        );
    }

    #[test]
    fn test_hotel_link_literal_encodes_once() {
        let url = links().hotel_link("New Orleans, LA", date(2026, 10, 29), date(2026, 10, 31));
        assert_eq!(
            url,
            "https://www.booking.com/searchresults.html?ss=New%20Orleans%2C%20LA&checkin=2026-10-29&checkout=2026-10-31&group_adults=2&no_rooms=1&order=price&aid=1234567"
        );
        assert!(!url.contains("%25"));
    }

    #[test]
    fn test_links_without_partner_ids() {
        let plain = AffiliateLinks::default();
        let url = plain.hotel_link("Miami", date(2026, 10, 29), date(2026, 10, 31));
        assert!(!url.contains("aid="));
        assert_eq!(
            plain.flight_link("JFK", "LHR", date(2026, 11, 5), date(2026, 11, 12)),
            plain.flight_search_url("JFK", "LHR", date(2026, 11, 5), date(2026, 11, 12))
        );
    }

    #[test]
    fn test_empty_tag_is_skipped() {
        let links = AffiliateLinks {
            flight_tag: Some(String::new()),
            hotel_publisher_id: None,
        };
        let url = links.flight_link("JFK", "LHR", date(2026, 11, 5), date(2026, 11, 12));
        assert!(url.ends_with("?sort=price_a"));
    }

    #[test]
    fn test_travel_dates() {
        let dates = TravelDates::from_today(date(2026, 10, 15));
        assert_eq!(dates.depart, date(2026, 11, 5));
        assert_eq!(dates.ret, date(2026, 11, 12));
        assert_eq!(dates.check_in, date(2026, 10, 29));
        assert_eq!(dates.check_out, date(2026, 10, 31));
    }

    #[test]
    fn test_rotation_links_counts() {
        let flights = flight_rotation(0).unwrap();
        let hotels = hotel_rotation(0).unwrap();
        let dates = TravelDates::from_today(date(2026, 10, 15));

        let all = rotation_links(&flights, &hotels, dates, &links(), LinkKind::All);
        assert_eq!(all.len(), 16);
        let only_hotels = rotation_links(&flights, &hotels, dates, &links(), LinkKind::Hotels);
        assert_eq!(only_hotels.len(), 4);
        assert_eq!(only_hotels[0].label, "Hotels in New York");
    }

    #[test]
    fn test_render_links_formats() {
        let links = vec![LabeledLink {
            kind: "flight",
            label: "New York (JFK) to London (LHR)".to_string(),
            url: "https://example.com/a?x=1&y=2".to_string(),
        }];

        assert_eq!(
            render_links(&links, LinkFormat::Markdown).unwrap(),
            "- [New York (JFK) to London (LHR)](https://example.com/a?x=1&y=2)\n"
        );
        assert_eq!(
            render_links(&links, LinkFormat::List).unwrap(),
            "https://example.com/a?x=1&y=2\n"
        );
        assert_eq!(
            render_links(&links, LinkFormat::Bligence).unwrap(),
            "[affiliate url=\"https://example.com/a?x=1&y=2\"]New York (JFK) to London (LHR)[/affiliate]\n"
        );

        let html = render_links(&links, LinkFormat::Html).unwrap();
        assert!(html.starts_with("<ul>\n"));
        assert!(html.contains("href=\"https://example.com/a?x=1&amp;y=2\""));

        let json = render_links(&links, LinkFormat::Json).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["kind"], "flight");
    }
}
