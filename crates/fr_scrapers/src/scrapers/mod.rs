use std::sync::Arc;

use async_trait::async_trait;
use fr_core::{Article, Region, Result};
use scraper::Html;

use crate::logging::Logger;

pub mod fetch;
pub mod rules;
pub mod sources;

use fetch::PageFetcher;
use sources::NewsSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceMetadata {
    pub name: &'static str,
    pub emoji: &'static str,
    pub region: Region,
    pub url: &'static str,
}

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Describes the listing page this scraper reads
    fn source_metadata(&self) -> SourceMetadata;

    /// Fetches the listing page and extracts its articles in document order
    async fn scrape(&self) -> Result<Vec<Article>>;

    /// Returns a list of CLI shorthand names for this scraper
    fn cli_names(&self) -> Vec<&str> {
        vec![self.source_metadata().region.code()]
    }
}

/// Scrapes one [`NewsSource`] through a shared fetcher.
pub struct RegionScraper {
    source: &'static NewsSource,
    fetcher: Arc<dyn PageFetcher>,
    logger: Logger,
}

impl RegionScraper {
    pub fn new(source: &'static NewsSource, fetcher: Arc<dyn PageFetcher>) -> Self {
        let logger = Logger::new()
            .with_prefix(source.metadata.emoji.to_string())
            .with_prefix(format!("[{}]", source.metadata.name));
        Self {
            source,
            fetcher,
            logger,
        }
    }

    pub fn parse(&self, html: &str) -> Result<Vec<Article>> {
        let document = Html::parse_document(html);
        self.source.rule.extract(self.source.metadata.region, &document)
    }
}

#[async_trait]
impl Scraper for RegionScraper {
    fn source_metadata(&self) -> SourceMetadata {
        self.source.metadata
    }

    async fn scrape(&self) -> Result<Vec<Article>> {
        let url = self.source.metadata.url;
        self.logger.debug(&format!("GET {}", url));
        let html = self.fetcher.fetch(url).await?;

        let articles = self.parse(&html)?;
        if articles.is_empty() {
            self.logger.warn("no articles matched, the page layout may have changed");
        } else {
            self.logger.info(&format!("{} articles", articles.len()));
        }
        Ok(articles)
    }
}
