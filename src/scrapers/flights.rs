//! Round-trip fare scraper.
//!
//! Walks every origin/destination pair in the day's rotation, loads the
//! price-sorted search page, and records the cheapest fare shown.

use super::extract::extract_flight_quote;
use super::{PageSource, ScrapeSettings};
use crate::links::{AffiliateLinks, TravelDates};
use crate::models::{percent_off, FlightDeal};
use crate::registry::{Airport, Destination, FlightRotation};
use crate::utils::polite_delay;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument, warn};

/// Scrape one fare per route. Failed routes are logged and skipped.
#[instrument(level = "info", skip_all, fields(day = rotation.day))]
pub async fn scrape_flights<S: PageSource>(
    source: &S,
    rotation: &FlightRotation,
    dates: TravelDates,
    links: &AffiliateLinks,
    settings: &ScrapeSettings,
    now: DateTime<Utc>,
) -> Vec<FlightDeal> {
    let routes = rotation.routes();
    let total = routes.len();
    info!(routes = total, depart = %dates.depart, ret = %dates.ret, "Scraping flight routes");

    let deals: Vec<FlightDeal> = stream::iter(routes.into_iter().enumerate())
        .then(|(i, (origin, destination))| async move {
            if i > 0 {
                polite_delay(settings).await;
            }
            scrape_route(source, &origin, &destination, dates, links, now).await
        })
        .filter_map(|deal| std::future::ready(deal))
        .collect()
        .await;

    info!(scraped = deals.len(), failed = total - deals.len(), "Finished flight routes");
    deals
}

async fn scrape_route<S: PageSource>(
    source: &S,
    origin: &Airport,
    destination: &Destination,
    dates: TravelDates,
    links: &AffiliateLinks,
    now: DateTime<Utc>,
) -> Option<FlightDeal> {
    let search_url = links.flight_search_url(origin.code, destination.code, dates.depart, dates.ret);
    let text = match source.page_text(&search_url).await {
        Ok(text) => text,
        Err(e) => {
            error!(origin = origin.code, destination = destination.code, error = %e, "Flight page failed to load");
            return None;
        }
    };

    let price = match extract_flight_quote(&text) {
        Ok(price) => price,
        Err(e) => {
            warn!(origin = origin.code, destination = destination.code, error = %e, "No fare extracted");
            return None;
        }
    };

    let pct = percent_off(destination.typical_price, price);
    info!(
        origin = origin.code,
        destination = destination.code,
        price,
        typical = destination.typical_price,
        percent_off = pct,
        "Found fare"
    );

    Some(FlightDeal {
        origin: origin.code.to_string(),
        origin_name: origin.city.to_string(),
        destination: destination.code.to_string(),
        destination_name: destination.city.to_string(),
        price,
        typical_price: destination.typical_price,
        percent_off: pct,
        depart_date: dates.depart,
        return_date: dates.ret,
        url: links.flight_link(origin.code, destination.code, dates.depart, dates.ret),
        scraped_at: now,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::flight_rotation;
    use crate::scrapers::testing::FakeSource;
    use chrono::NaiveDate;
    use std::time::Duration;

    fn instant_settings() -> ScrapeSettings {
        ScrapeSettings {
            delay: Duration::ZERO,
            jitter_ms: 0,
            settle: Duration::ZERO,
            ..ScrapeSettings::default()
        }
    }

    #[tokio::test]
    async fn test_scrape_flights_skips_failed_routes() {
        // Sunday: JFK, LAX, ORD to LHR, CDG, CUN, HNL
        let source = FakeSource::default()
            .with_page("JFK-LHR", "Cheapest $389 Best $512")
            .with_page("LAX-CUN", "Nothing found")
            .with_page("ORD-HNL", "$702");
        let rotation = flight_rotation(0).unwrap();
        let dates = TravelDates::from_today(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        let links = AffiliateLinks {
            flight_tag: Some("tag-20".to_string()),
            hotel_publisher_id: None,
        };

        let deals = scrape_flights(&source, &rotation, dates, &links, &instant_settings(), Utc::now()).await;

        assert_eq!(source.request_count(), 12);
        assert_eq!(deals.len(), 2);

        assert_eq!(deals[0].origin, "JFK");
        assert_eq!(deals[0].destination, "LHR");
        assert_eq!(deals[0].price, 389);
        assert_eq!(deals[0].typical_price, 750);
        assert_eq!(deals[0].percent_off, 48);
        assert!(deals[0].url.ends_with("&affid=tag-20"));

        assert_eq!(deals[1].destination, "HNL");
        assert_eq!(deals[1].percent_off, -8);
    }
}
