//! Nightly hotel rate scraper.

use super::extract::{extract_hotel_quotes, HotelQuote};
use super::{PageSource, ScrapeSettings};
use crate::links::{AffiliateLinks, TravelDates};
use crate::models::{percent_off, HotelDeal};
use crate::registry::HotelDestination;
use crate::utils::polite_delay;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{error, info, instrument, warn};

/// Scrape every listing on each destination's results page.
#[instrument(level = "info", skip_all, fields(cities = destinations.len()))]
pub async fn scrape_hotels<S: PageSource>(
    source: &S,
    destinations: &[HotelDestination],
    dates: TravelDates,
    links: &AffiliateLinks,
    settings: &ScrapeSettings,
    now: DateTime<Utc>,
) -> Vec<HotelDeal> {
    info!(check_in = %dates.check_in, check_out = %dates.check_out, "Scraping hotel destinations");

    let per_city: Vec<Vec<HotelDeal>> = stream::iter(destinations.iter().enumerate())
        .then(|(i, destination)| async move {
            if i > 0 {
                polite_delay(settings).await;
            }
            scrape_city(source, destination, dates, links, now).await
        })
        .collect()
        .await;

    let deals: Vec<HotelDeal> = per_city.into_iter().flatten().collect();
    info!(listings = deals.len(), "Finished hotel destinations");
    deals
}

async fn scrape_city<S: PageSource>(
    source: &S,
    destination: &HotelDestination,
    dates: TravelDates,
    links: &AffiliateLinks,
    now: DateTime<Utc>,
) -> Vec<HotelDeal> {
    let search_url = links.hotel_search_url(destination.city, dates.check_in, dates.check_out);
    let text = match source.page_text(&search_url).await {
        Ok(text) => text,
        Err(e) => {
            error!(city = destination.city, error = %e, "Hotel page failed to load");
            return Vec::new();
        }
    };

    let quotes = match extract_hotel_quotes(&text) {
        Ok(quotes) => quotes,
        Err(e) => {
            warn!(city = destination.city, error = %e, "No hotel listings extracted");
            return Vec::new();
        }
    };
    info!(city = destination.city, listings = quotes.len(), "Extracted hotel listings");

    let url = links.hotel_link(destination.city, dates.check_in, dates.check_out);
    quotes
        .into_iter()
        .map(|HotelQuote { name, price, rating }| HotelDeal {
            name,
            location: destination.city.to_string(),
            price,
            typical_price: destination.typical_price,
            percent_off: percent_off(destination.typical_price, price),
            rating,
            check_in: dates.check_in,
            check_out: dates.check_out,
            url: url.clone(),
            scraped_at: now,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::hotel_rotation;
    use crate::scrapers::testing::FakeSource;
    use chrono::NaiveDate;
    use std::time::Duration;

    #[tokio::test]
    async fn test_scrape_hotels_collects_listings_per_city() {
        // Sunday: New York, Las Vegas, Orlando, Miami
        let source = FakeSource::default()
            .with_page("ss=New%20York", "The Jane\nRated 4.1\n$179\n\nPod 51\n$99")
            .with_page("ss=Miami", "Sold out everywhere");
        let destinations = hotel_rotation(0).unwrap();
        let dates = TravelDates::from_today(NaiveDate::from_ymd_opt(2026, 10, 15).unwrap());
        let settings = ScrapeSettings {
            delay: Duration::ZERO,
            jitter_ms: 0,
            settle: Duration::ZERO,
            ..ScrapeSettings::default()
        };

        let deals = scrape_hotels(
            &source,
            &destinations,
            dates,
            &AffiliateLinks::default(),
            &settings,
            Utc::now(),
        )
        .await;

        assert_eq!(source.request_count(), 4);
        assert_eq!(deals.len(), 2);
        assert_eq!(deals[0].name, "The Jane");
        assert_eq!(deals[0].location, "New York");
        assert_eq!(deals[0].rating, Some(4.1));
        assert_eq!(deals[0].percent_off, 36);
        assert_eq!(deals[1].name, "Pod 51");
        assert_eq!(deals[1].percent_off, 65);
        assert!(deals[1].url.contains("checkin=2026-10-29"));
    }
}
