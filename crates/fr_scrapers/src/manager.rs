use std::sync::Arc;

use fr_core::{ArticleBatch, Error, Region, Result};
use tracing::info;

use crate::scrapers::fetch::PageFetcher;
use crate::scrapers::sources::SOURCES;
use crate::scrapers::{RegionScraper, Scraper};

type BoxedScraper = Box<dyn Scraper>;

/// Owns one scraper per configured region and runs them one after another.
pub struct ScraperManager {
    scrapers: Vec<BoxedScraper>,
}

impl ScraperManager {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        let scrapers = SOURCES
            .iter()
            .map(|source| Box::new(RegionScraper::new(source, fetcher.clone())) as BoxedScraper)
            .collect();
        Self { scrapers }
    }

    pub fn with_scrapers(scrapers: Vec<BoxedScraper>) -> Self {
        Self { scrapers }
    }

    pub fn scrapers(&self) -> &[BoxedScraper] {
        &self.scrapers
    }

    pub fn get_scraper(&self, region: Region) -> Result<&dyn Scraper> {
        self.scrapers
            .iter()
            .find(|s| s.source_metadata().region == region)
            .map(|s| &**s)
            .ok_or_else(|| Error::Scraping(format!("No scraper configured for {}", region)))
    }

    pub async fn scrape_region(&self, region: Region) -> Result<ArticleBatch> {
        let scraper = self.get_scraper(region)?;
        let articles = scraper.scrape().await?;
        Ok(ArticleBatch::new(region, articles))
    }

    /// Scrapes every region in [`Region::ALL`] order. The first failure aborts the run.
    pub async fn scrape_all(&self) -> Result<Vec<ArticleBatch>> {
        let mut batches = Vec::with_capacity(Region::ALL.len());
        for region in Region::ALL {
            batches.push(self.scrape_region(region).await?);
        }
        let total: usize = batches.iter().map(ArticleBatch::len).sum();
        info!("🦗 Scraped {} articles from {} sources", total, batches.len());
        Ok(batches)
    }
}
