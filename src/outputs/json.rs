//! Flat-file JSON output for scraped deals.
//!
//! Each scrape overwrites its file wholesale:
//! ```text
//! output_dir/
//! ├── flight-deals.json
//! ├── hotel-deals.json
//! └── all-deals.json
//! ```
//!
//! Every file is a [`DealFile`] envelope. Reading is forgiving: a missing or
//! unreadable file is treated as an empty list so the next run can start
//! fresh.

use crate::models::DealFile;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::path::Path;
use tokio::fs;
use tracing::{error, info, instrument, warn};

pub const FLIGHTS_FILE: &str = "flight-deals.json";
pub const HOTELS_FILE: &str = "hotel-deals.json";
pub const COMBINED_FILE: &str = "all-deals.json";

/// Write `deals` to `{output_dir}/{file_name}`, creating the directory.
#[instrument(level = "info", skip_all, fields(%output_dir, %file_name, count = deals.len()))]
pub async fn write_deals<T: Serialize>(
    output_dir: &str,
    file_name: &str,
    deals: Vec<T>,
    generated: DateTime<Utc>,
) -> Result<(), Box<dyn Error>> {
    let file = DealFile::new(deals, generated);
    let json = serde_json::to_string_pretty(&file)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create output dir");
        return Err(e.into());
    }

    let path = Path::new(output_dir).join(file_name);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote deals file");
    Ok(())
}

/// Read the deals from `{output_dir}/{file_name}`, or an empty list.
#[instrument(level = "info", skip_all, fields(%output_dir, %file_name))]
pub async fn read_deals<T: DeserializeOwned>(output_dir: &str, file_name: &str) -> Vec<T> {
    let path = Path::new(output_dir).join(file_name);
    let raw = match fs::read_to_string(&path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "No previous deals file; starting empty");
            return Vec::new();
        }
    };

    match serde_json::from_str::<DealFile<T>>(&raw) {
        Ok(file) => {
            info!(path = %path.display(), count = file.deals.len(), "Loaded deals file");
            file.deals
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Deals file is malformed; starting empty");
            Vec::new()
        }
    }
}
