use clap::Args;
use fr_core::{ArticleBatch, Region, Result};

use crate::manager::ScraperManager;

#[derive(Args, Debug, Clone)]
pub struct ScraperArgs {
    /// Region to scrape (us, jp, kr). Scrapes every region when omitted.
    pub region: Option<Region>,
    /// List the configured sources instead of scraping
    #[arg(long)]
    pub list: bool,
}

pub async fn handle_command(args: ScraperArgs, manager: &ScraperManager) -> Result<()> {
    if args.list {
        println!("Available scrapers:");
        for scraper in manager.scrapers() {
            let meta = scraper.source_metadata();
            println!(
                "  {} {} ({}) {}",
                meta.emoji,
                scraper.cli_names().join(", "),
                meta.name,
                meta.url
            );
        }
        return Ok(());
    }

    let batches = match args.region {
        Some(region) => vec![manager.scrape_region(region).await?],
        None => manager.scrape_all().await?,
    };
    for batch in &batches {
        print!("{}", format_batch(batch));
    }
    Ok(())
}

fn format_batch(batch: &ArticleBatch) -> String {
    let mut out = format!("{} ({} articles)\n", batch.region, batch.len());
    for article in &batch.articles {
        out.push_str(&format!("- {}\n", article.title));
        if let Some(summary) = &article.summary {
            out.push_str(&format!("    {}\n", summary));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use fr_core::Article;

    #[test]
    fn test_format_batch() {
        let batch = ArticleBatch::new(
            Region::Japan,
            vec![
                Article::new("BOJ keeps policy unchanged", Some("Yen weakens".to_string())),
                Article::new("Toyota raises forecast", None),
            ],
        );
        assert_eq!(
            format_batch(&batch),
            "Japan (2 articles)\n- BOJ keeps policy unchanged\n    Yen weakens\n- Toyota raises forecast\n"
        );
    }
}
