//! Output generation for deal files and generated posts.
//!
//! # Submodules
//!
//! - [`json`]: Writes and reads the flat `DealFile` JSON outputs
//! - [`posts`]: Writes generated posts locally as JSON records and HTML
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── flight-deals.json
//! ├── hotel-deals.json
//! ├── all-deals.json
//! └── posts/
//!     ├── flight-deals-2026-10-15.json
//!     ├── flight-deals-2026-10-15.html
//!     ├── hotel-deals-2026-10-15.json
//!     └── hotel-deals-2026-10-15.html
//! ```

pub mod json;
pub mod posts;
