//! # Travel Deals
//!
//! Scrapes flight fares and hotel rates from travel search sites, keeps the
//! ones that beat their typical price, and turns them into affiliate blog
//! posts that can be published to WordPress.
//!
//! ## Usage
//!
//! ```sh
//! travel_deals run-all
//! travel_deals generate --publish
//! travel_deals links --format html
//! ```
//!
//! ## Pipeline
//!
//! The application runs one step after another, never in parallel:
//! 1. **Rotation**: pick today's origins, destinations and hotel cities
//! 2. **Scraping**: load each search page and extract a price
//! 3. **Selection**: filter by discount, merge with the last week's deals, rank
//! 4. **Output**: write the deal files
//! 5. **Posts**: render HTML posts and optionally upsert them by slug

use chrono::{Local, Utc};
use clap::Parser;
use std::error::Error;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{fmt as tfmt, EnvFilter};

mod api;
mod cli;
mod config;
mod deals;
mod links;
mod models;
mod outputs;
mod registry;
mod render;
mod scrapers;
mod utils;

use api::{publish_or_update, PostStatus, WordPressClient};
use cli::{Cli, Command, GenerateArgs, LinksArgs};
use config::{Settings, WordPressConfig};
use links::{render_links, rotation_links, TravelDates};
use models::{AnyDeal, FlightDeal, HotelDeal, Post};
use outputs::json::{read_deals, write_deals, COMBINED_FILE, FLIGHTS_FILE, HOTELS_FILE};
use outputs::posts::write_post;
use scrapers::Fetcher;
use utils::ensure_writable_dir;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_writer(std::io::stderr)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let start_time = std::time::Instant::now();
    let args = Cli::parse();
    let settings = Settings::from_cli(&args);
    debug!(output_dir = %settings.output_dir, day = settings.day, fetch = ?settings.fetch, "Parsed CLI arguments");

    match args.command {
        Command::RunAll => {
            ensure_writable_dir(&settings.output_dir).await?;
            let fetcher = Fetcher::new(settings.fetch, &settings.scrape)?;
            let flights = run_flights(&settings, &fetcher).await?;
            let hotels = run_hotels(&settings, &fetcher).await?;
            write_combined(&settings, flights, hotels).await?;
        }
        Command::Flights => {
            ensure_writable_dir(&settings.output_dir).await?;
            let fetcher = Fetcher::new(settings.fetch, &settings.scrape)?;
            run_flights(&settings, &fetcher).await?;
        }
        Command::Hotels => {
            ensure_writable_dir(&settings.output_dir).await?;
            let fetcher = Fetcher::new(settings.fetch, &settings.scrape)?;
            run_hotels(&settings, &fetcher).await?;
        }
        Command::Generate(ref generate) => {
            ensure_writable_dir(&settings.output_dir).await?;
            run_generate(&settings, generate).await?;
        }
        Command::Links(ref link_args) => {
            print!("{}", run_links(&settings, link_args)?);
        }
    }

    let elapsed = start_time.elapsed();
    info!(?elapsed, secs = elapsed.as_secs(), "Execution complete");
    Ok(())
}

/// Scrape today's flight routes, merge with recent deals and write the file.
#[instrument(level = "info", skip_all, fields(day = settings.day))]
async fn run_flights(settings: &Settings, fetcher: &Fetcher) -> Result<Vec<FlightDeal>, Box<dyn Error>> {
    let rotation = registry::flight_rotation(settings.day)?;
    let dates = TravelDates::from_today(Local::now().date_naive());
    let now = Utc::now();

    let fresh = scrapers::flights::scrape_flights(
        fetcher,
        &rotation,
        dates,
        &settings.links,
        &settings.scrape,
        now,
    )
    .await;
    let previous = read_deals::<FlightDeal>(&settings.output_dir, FLIGHTS_FILE).await;
    let selected = deals::merge_recent(fresh, previous, now, deals::is_flight_deal);
    info!(count = selected.len(), "Selected flight deals");

    write_deals(&settings.output_dir, FLIGHTS_FILE, selected.clone(), now).await?;
    Ok(selected)
}

/// Scrape today's hotel cities, merge with recent deals and write the file.
#[instrument(level = "info", skip_all, fields(day = settings.day))]
async fn run_hotels(settings: &Settings, fetcher: &Fetcher) -> Result<Vec<HotelDeal>, Box<dyn Error>> {
    let destinations = registry::hotel_rotation(settings.day)?;
    let dates = TravelDates::from_today(Local::now().date_naive());
    let now = Utc::now();

    let fresh = scrapers::hotels::scrape_hotels(
        fetcher,
        &destinations,
        dates,
        &settings.links,
        &settings.scrape,
        now,
    )
    .await;
    let previous = read_deals::<HotelDeal>(&settings.output_dir, HOTELS_FILE).await;
    let selected = deals::merge_recent(fresh, previous, now, deals::is_hotel_deal);
    info!(count = selected.len(), "Selected hotel deals");

    write_deals(&settings.output_dir, HOTELS_FILE, selected.clone(), now).await?;
    Ok(selected)
}

async fn write_combined(
    settings: &Settings,
    flights: Vec<FlightDeal>,
    hotels: Vec<HotelDeal>,
) -> Result<(), Box<dyn Error>> {
    let combined: Vec<AnyDeal> = flights
        .into_iter()
        .map(AnyDeal::Flight)
        .chain(hotels.into_iter().map(AnyDeal::Hotel))
        .collect();
    write_deals(&settings.output_dir, COMBINED_FILE, combined, Utc::now()).await
}

/// Render both posts, write them locally, and publish when asked.
///
/// A failed publish is logged and does not stop the other post.
#[instrument(level = "info", skip_all, fields(publish = generate.publish))]
async fn run_generate(settings: &Settings, generate: &GenerateArgs) -> Result<(), Box<dyn Error>> {
    let today = Local::now().date_naive();
    let flights = read_deals::<FlightDeal>(&settings.output_dir, FLIGHTS_FILE).await;
    let hotels = read_deals::<HotelDeal>(&settings.output_dir, HOTELS_FILE).await;

    let posts = vec![
        render::render_flight_post(&flights, today, generate.flight_category_id),
        render::render_hotel_post(&hotels, today, generate.hotel_category_id),
    ];
    for post in &posts {
        write_post(&settings.output_dir, post).await?;
    }

    if !generate.publish {
        info!(count = posts.len(), "Generated posts locally; pass --publish to upload");
        return Ok(());
    }

    let wp = WordPressConfig::from_args(generate)?;
    let client = WordPressClient::new(&wp.site_url, &wp.username, &wp.app_password)?;
    publish_all(&client, &posts, generate.status).await;
    Ok(())
}

async fn publish_all<A: api::PostsApi>(api: &A, posts: &[Post], status: PostStatus) {
    for post in posts {
        match publish_or_update(api, post, status).await {
            Ok(outcome) => info!(slug = %post.slug, ?outcome, "Post published"),
            Err(e) => error!(slug = %post.slug, error = %e, "Publish failed; continuing with next post"),
        }
    }
}

/// Affiliate links for the day's rotation in the requested format.
fn run_links(settings: &Settings, args: &LinksArgs) -> Result<String, Box<dyn Error>> {
    let flights = registry::flight_rotation(settings.day)?;
    let hotels = registry::hotel_rotation(settings.day)?;
    let dates = TravelDates::from_today(Local::now().date_naive());
    let links = rotation_links(&flights, &hotels, dates, &settings.links, args.kind);
    info!(count = links.len(), format = ?args.format, "Generated links");
    Ok(render_links(&links, args.format)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::{ApiError, PostPayload};
    use chrono::NaiveDate;
    use std::sync::Mutex;

    /// CMS that rejects every call for one slug.
    struct FlakyCms {
        broken_slug: &'static str,
        calls: Mutex<Vec<String>>,
    }

    impl FlakyCms {
        fn rejected(&self, slug: &str) -> Result<(), Box<dyn Error>> {
            if slug == self.broken_slug {
                return Err(Box::new(ApiError {
                    status: 500,
                    url: "https://blog.example.com/wp-json/wp/v2/posts".to_string(),
                    body: "internal error".to_string(),
                }));
            }
            Ok(())
        }
    }

    impl api::PostsApi for FlakyCms {
        async fn find_by_slug(&self, slug: &str) -> Result<Option<u64>, Box<dyn Error>> {
            self.calls.lock().unwrap().push(format!("find {}", slug));
            self.rejected(slug)?;
            Ok(None)
        }

        async fn create(&self, payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>> {
            self.calls.lock().unwrap().push(format!("create {}", payload.slug));
            self.rejected(payload.slug)?;
            Ok(7)
        }

        async fn update(&self, id: u64, _payload: &PostPayload<'_>) -> Result<u64, Box<dyn Error>> {
            Ok(id)
        }

        async fn resolve_tags(&self, names: &[String]) -> Result<Vec<u64>, Box<dyn Error>> {
            Ok((1..=names.len() as u64).collect())
        }
    }

    #[tokio::test]
    async fn test_publish_all_continues_after_failed_post() {
        let date = NaiveDate::from_ymd_opt(2026, 10, 15).unwrap();
        let posts = vec![
            render::render_flight_post(&[], date, None),
            render::render_hotel_post(&[], date, None),
        ];
        let cms = FlakyCms {
            broken_slug: "flight-deals-2026-10-15",
            calls: Mutex::new(Vec::new()),
        };

        publish_all(&cms, &posts, PostStatus::Publish).await;

        assert_eq!(
            *cms.calls.lock().unwrap(),
            vec![
                "find flight-deals-2026-10-15",
                "find hotel-deals-2026-10-15",
                "create hotel-deals-2026-10-15",
            ]
        );
    }
}
