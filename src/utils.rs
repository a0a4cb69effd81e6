//! Utility functions for pacing, string manipulation, and file system checks.
//!
//! This module provides helper functions used throughout the application:
//! - Randomized pauses between page navigations
//! - String truncation and slugification for logging and URLs
//! - File system validation for output directories

use crate::scrapers::ScrapeSettings;
use rand::{rng, Rng};
use std::error::Error;
use std::fs as stdfs;
use std::time::Duration;
use tokio::fs;
use tokio::time::sleep;
use tracing::{debug, info, instrument};

/// Sleep for the configured delay plus up to `jitter_ms` of random jitter.
pub async fn polite_delay(settings: &ScrapeSettings) {
    let jitter_ms: u64 = if settings.jitter_ms == 0 {
        0
    } else {
        rng().random_range(0..=settings.jitter_ms)
    };
    let delay = settings.delay + Duration::from_millis(jitter_ms);
    if delay.is_zero() {
        return;
    }
    debug!(?delay, "Pausing before next page");
    sleep(delay).await;
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to `max` bytes (backing off to a character
/// boundary) with an ellipsis and byte count indicator appended.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(truncate_for_log("short", 100), "short");
/// assert_eq!(truncate_for_log("a".repeat(500), 10), "aaaaaaaaaa…(+490 bytes)");
/// ```
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}…(+{} bytes)", &s[..end], s.len() - end)
}

/// Convert a title to a URL-friendly slug.
///
/// Lowercases the text, drops anything that is not alphanumeric, a space or
/// a hyphen, and replaces spaces with hyphens.
///
/// # Examples
///
/// ```ignore
/// assert_eq!(slugify_title("Hello World"), "hello-world");
/// assert_eq!(slugify_title("Test-Article!"), "test-article");
/// ```
pub fn slugify_title(title: &str) -> String {
    title
        .to_lowercase()
        .replace(|c: char| !c.is_alphanumeric() && c != ' ' && c != '-', "")
        .replace(' ', "-")
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if it doesn't exist, then writes and removes a
/// probe file.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    fs::create_dir_all(path).await?;
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    stdfs::File::create(&probe_path)?;
    let _ = stdfs::remove_file(&probe_path);
    info!("Output directory is writable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_for_log_short_string() {
        let s = "Hello, world!";
        assert_eq!(truncate_for_log(s, 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_respects_char_boundaries() {
        let result = truncate_for_log("→→→", 4);
        assert_eq!(result, "→…(+6 bytes)");
    }

    #[test]
    fn test_slugify_title() {
        assert_eq!(slugify_title("Hello World"), "hello-world");
        assert_eq!(slugify_title("Test-Article!"), "test-article");
        assert_eq!(
            slugify_title("Flight Deals: October 15, 2026"),
            "flight-deals-october-15-2026"
        );
    }

    #[tokio::test]
    async fn test_polite_delay_zero_returns_immediately() {
        let settings = ScrapeSettings {
            delay: Duration::ZERO,
            jitter_ms: 0,
            nav_timeout: Duration::from_secs(1),
            settle: Duration::ZERO,
        };
        let t0 = std::time::Instant::now();
        polite_delay(&settings).await;
        assert!(t0.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_directory() {
        let dir = std::env::temp_dir().join(format!("travel_deals_utils_{}", std::process::id()));
        let path = dir.to_string_lossy().to_string();
        ensure_writable_dir(&path).await.unwrap();
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
