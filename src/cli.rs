//! Command-line interface definitions for Travel Deals.
//!
//! This module defines the CLI arguments and options using the `clap` crate.
//! Credentials and partner ids are usually supplied through environment
//! variables (or a `.env` file) rather than flags.

use crate::api::PostStatus;
use crate::links::{LinkFormat, LinkKind};
use crate::scrapers::FetchMode;
use clap::{Args, Parser, Subcommand};

/// Command-line arguments for the Travel Deals application.
///
/// # Examples
///
/// ```sh
/// # Scrape today's flight and hotel rotation
/// travel_deals run-all
///
/// # Render posts locally, then publish them
/// travel_deals generate
/// travel_deals generate --publish
///
/// # Print affiliate links for Tuesday's rotation as HTML
/// travel_deals --day 2 links --format html
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding deal files and generated posts
    #[arg(short, long, env = "DEALS_OUTPUT_DIR", default_value = "data", global = true)]
    pub output_dir: String,

    /// Rotation day to use instead of today (Sunday = 0)
    #[arg(long, global = true)]
    pub day: Option<usize>,

    /// How search pages are loaded
    #[arg(long, value_enum, default_value_t = FetchMode::Browser, global = true)]
    pub fetch: FetchMode,

    /// Fixed pause between page loads, in seconds
    #[arg(long, default_value_t = 5, global = true)]
    pub delay_secs: u64,

    /// Maximum random jitter added to the pause, in milliseconds
    #[arg(long, default_value_t = 3000, global = true)]
    pub jitter_ms: u64,

    /// Per-navigation timeout, in seconds
    #[arg(long, default_value_t = 30, global = true)]
    pub nav_timeout_secs: u64,

    /// Wait after navigation before reading the page, in seconds
    #[arg(long, default_value_t = 4, global = true)]
    pub settle_secs: u64,

    /// Flight partner tag appended to booking links
    #[arg(long, env = "AFFILIATE_TAG", global = true)]
    pub affiliate_tag: Option<String>,

    /// Hotel partner publisher id appended to booking links
    #[arg(long, env = "BOOKING_PUBLISHER_ID", global = true)]
    pub publisher_id: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scrape flights and hotels, then write the combined file
    RunAll,
    /// Scrape today's flight routes
    Flights,
    /// Scrape today's hotel destinations
    Hotels,
    /// Render blog posts from the latest deal files
    Generate(GenerateArgs),
    /// Print affiliate links for the day's rotation without scraping
    Links(LinksArgs),
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Publish the posts to WordPress after writing them locally
    #[arg(long)]
    pub publish: bool,

    /// Status given to published posts
    #[arg(long, value_enum, default_value_t = PostStatus::Publish)]
    pub status: PostStatus,

    /// WordPress site root, e.g. https://blog.example.com
    #[arg(long, env = "WP_SITE_URL")]
    pub site_url: Option<String>,

    /// WordPress user that owns the application password
    #[arg(long, env = "WP_USERNAME")]
    pub username: Option<String>,

    /// WordPress application password
    #[arg(long, env = "WP_APP_PASSWORD", hide_env_values = true)]
    pub app_password: Option<String>,

    /// Category id for the flight post
    #[arg(long, env = "WP_FLIGHT_CATEGORY_ID")]
    pub flight_category_id: Option<u64>,

    /// Category id for the hotel post
    #[arg(long, env = "WP_HOTEL_CATEGORY_ID")]
    pub hotel_category_id: Option<u64>,
}

#[derive(Args, Debug)]
pub struct LinksArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value_t = LinkFormat::Markdown)]
    pub format: LinkFormat,

    /// Which links to print
    #[arg(short, long, value_enum, default_value_t = LinkKind::All)]
    pub kind: LinkKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_run_all() {
        let cli = Cli::parse_from(["travel_deals", "--output-dir", "./out", "run-all"]);
        assert_eq!(cli.output_dir, "./out");
        assert!(matches!(cli.command, Command::RunAll));
        assert_eq!(cli.fetch, FetchMode::Browser);
        assert_eq!(cli.delay_secs, 5);
    }

    #[test]
    fn test_cli_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["travel_deals", "flights", "--day", "3", "--fetch", "http"]);
        assert!(matches!(cli.command, Command::Flights));
        assert_eq!(cli.day, Some(3));
        assert_eq!(cli.fetch, FetchMode::Http);
    }

    #[test]
    fn test_cli_generate_publish() {
        let cli = Cli::parse_from([
            "travel_deals",
            "generate",
            "--publish",
            "--status",
            "draft",
            "--site-url",
            "https://blog.example.com",
            "--flight-category-id",
            "12",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert!(args.publish);
                assert_eq!(args.status, PostStatus::Draft);
                assert_eq!(args.site_url.as_deref(), Some("https://blog.example.com"));
                assert_eq!(args.flight_category_id, Some(12));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_links_formats() {
        let cli = Cli::parse_from(["travel_deals", "links", "-f", "bligence", "-k", "hotels"]);
        match cli.command {
            Command::Links(args) => {
                assert_eq!(args.format, LinkFormat::Bligence);
                assert_eq!(args.kind, LinkKind::Hotels);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
