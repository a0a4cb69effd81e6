//! Deal filtering, deduplication, ranking and the cross-run merge.

use crate::models::{Deal, FlightDeal, HotelDeal};
use chrono::{DateTime, Duration, Utc};
use itertools::Itertools;
use tracing::debug;

/// Maximum number of deals kept per post type.
pub const TOP_DEALS: usize = 20;

/// Previous deals younger than this are carried into the next run.
pub const MERGE_WINDOW_DAYS: i64 = 7;

/// Flights must beat their typical fare by more than 15%.
pub fn is_flight_deal(deal: &FlightDeal) -> bool {
    deal.percent_off > 15
}

/// Hotels qualify at 25% off, or when they are cheap and well rated.
pub fn is_hotel_deal(deal: &HotelDeal) -> bool {
    deal.percent_off >= 25 || (deal.price < 150 && deal.rating.is_some_and(|r| r >= 4.0))
}

/// Keep the first occurrence of each composite key.
pub fn dedup<T: Deal>(deals: Vec<T>) -> Vec<T> {
    deals.into_iter().unique_by(|d| d.key()).collect()
}

/// Stable sort by percent-off, highest first, truncated to [`TOP_DEALS`].
pub fn rank<T: Deal>(mut deals: Vec<T>) -> Vec<T> {
    deals.sort_by(|a, b| b.percent_off().cmp(&a.percent_off()));
    deals.truncate(TOP_DEALS);
    deals
}

/// Filter, dedup and rank in one pass.
pub fn select<T: Deal>(deals: Vec<T>, admit: impl Fn(&T) -> bool) -> Vec<T> {
    let admitted: Vec<T> = deals.into_iter().filter(|d| admit(d)).collect();
    rank(dedup(admitted))
}

/// Merge this run's deals with those kept from previous runs.
///
/// Previous deals older than [`MERGE_WINDOW_DAYS`] are dropped. Fresh deals
/// come first so they win any key collision.
pub fn merge_recent<T: Deal>(
    fresh: Vec<T>,
    previous: Vec<T>,
    now: DateTime<Utc>,
    admit: impl Fn(&T) -> bool,
) -> Vec<T> {
    let cutoff = now - Duration::days(MERGE_WINDOW_DAYS);
    let before = previous.len();
    let recent: Vec<T> = previous
        .into_iter()
        .filter(|d| d.scraped_at() >= cutoff)
        .collect();
    debug!(
        kept = recent.len(),
        expired = before - recent.len(),
        "Filtered previous deals by merge window"
    );

    select(fresh.into_iter().chain(recent).collect(), admit)
}
