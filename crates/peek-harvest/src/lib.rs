//! peek stylesheet harvester
//!
//! Walks the document's stylesheets once (after the page settles) and builds
//! the rule database: structured rule-list access where possible, raw-text
//! fetch-and-scan fallback for access-restricted sheets. Failures degrade
//! coverage, never abort the harvest.

mod fetch;
mod harvester;
mod source;

pub use fetch::{HttpSheetFetcher, SheetFetcher};
pub use harvester::harvest;
pub use source::sheet_source;

use thiserror::Error;

/// Fallback-path failure. Always recovered by skipping the sheet.
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("HTTP {status} fetching {url}")]
    Http { status: u16, url: String },

    #[error("network error fetching {url}: {message}")]
    Network { url: String, message: String },

    #[error("restricted sheet has no href to fetch")]
    MissingHref,
}
