//! Website fetching and update extraction for competitor pages.

pub mod error;
pub mod extract;
pub mod fetcher;

pub use error::ScraperError;
pub use extract::{extract_candidates, NO_TITLE};
pub use fetcher::{scrape_competitor, ScrapeOutcome, SiteFetcher};
