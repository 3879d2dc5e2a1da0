pub mod cli;
pub mod logging;
pub mod manager;
pub mod scrapers;

pub use cli::{handle_command, ScraperArgs};
pub use manager::ScraperManager;
pub use scrapers::fetch::{FixtureFetcher, HttpFetcher, PageFetcher};
pub use scrapers::{RegionScraper, Scraper, SourceMetadata};

pub mod prelude {
    pub use super::scrapers::Scraper;
    pub use fr_core::{Article, ArticleBatch, Error, Region, Result};
}
