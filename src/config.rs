//! Immutable run configuration.
//!
//! The parsed [`Cli`] is converted once into [`Settings`] (and, when
//! publishing, a [`WordPressConfig`]); everything downstream takes these by
//! reference.

use crate::cli::{Cli, GenerateArgs};
use crate::links::AffiliateLinks;
use crate::registry::today_index;
use crate::scrapers::{FetchMode, ScrapeSettings};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Settings {
    pub output_dir: String,
    /// Rotation day, Sunday = 0.
    pub day: usize,
    pub fetch: FetchMode,
    pub scrape: ScrapeSettings,
    pub links: AffiliateLinks,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Self {
        Self {
            output_dir: cli.output_dir.clone(),
            day: cli.day.unwrap_or_else(today_index),
            fetch: cli.fetch,
            scrape: ScrapeSettings {
                delay: Duration::from_secs(cli.delay_secs),
                jitter_ms: cli.jitter_ms,
                nav_timeout: Duration::from_secs(cli.nav_timeout_secs),
                settle: Duration::from_secs(cli.settle_secs),
            },
            links: AffiliateLinks {
                flight_tag: cli.affiliate_tag.clone(),
                hotel_publisher_id: cli.publisher_id.clone(),
            },
        }
    }
}

/// Credentials for the WordPress REST API.
#[derive(Debug, Clone, PartialEq)]
pub struct WordPressConfig {
    pub site_url: String,
    pub username: String,
    pub app_password: String,
}

/// A setting required for the requested command is missing.
#[derive(Debug, PartialEq)]
pub struct ConfigError {
    pub missing: Vec<&'static str>,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing required settings: {}", self.missing.join(", "))
    }
}

impl std::error::Error for ConfigError {}

impl WordPressConfig {
    pub fn from_args(args: &GenerateArgs) -> Result<Self, ConfigError> {
        let present = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_string);
        let site_url = present(&args.site_url);
        let username = present(&args.username);
        let app_password = present(&args.app_password);

        match (site_url, username, app_password) {
            (Some(site_url), Some(username), Some(app_password)) => Ok(Self {
                site_url,
                username,
                app_password,
            }),
            (site_url, username, app_password) => {
                let mut missing = Vec::new();
                if site_url.is_none() {
                    missing.push("WP_SITE_URL");
                }
                if username.is_none() {
                    missing.push("WP_USERNAME");
                }
                if app_password.is_none() {
                    missing.push("WP_APP_PASSWORD");
                }
                Err(ConfigError { missing })
            }
        }
    }
}
