use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use fr_agent::{FinancialNewsAgent, Report, WkHtmlToPdf, DEFAULT_OUTPUT_DIR};
use fr_core::{Error, Result};
use fr_inference::{Config, DEFAULT_MODEL};
use fr_scrapers::{handle_command, HttpFetcher, ScraperArgs, ScraperManager};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about = "Daily US / Japan / Korea market report generator", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Scrape the news, analyze it and write today's PDF report (default)
    Report(ReportArgs),
    /// Print scraped articles without calling the model
    Scrape(ScraperArgs),
}

#[derive(clap::Args, Debug, Clone, PartialEq)]
struct ReportArgs {
    /// Existing directory the PDF is written into
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output_dir: PathBuf,
    /// Completion model identifier (`dummy` for an offline run)
    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,
}

impl Default for ReportArgs {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

#[derive(Debug)]
enum Outcome {
    MissingCredential(String),
    Completed(Report),
}

/// Runs the whole pipeline. Returns early, before any network call, when the
/// API key is not configured.
async fn report<F>(args: ReportArgs, lookup: F) -> Result<Outcome>
where
    F: Fn(&str) -> Option<String>,
{
    let config = match Config::from_lookup(lookup) {
        Ok(config) => config.with_model(args.model),
        Err(Error::MissingCredential(var)) => return Ok(Outcome::MissingCredential(var)),
        Err(e) => return Err(e),
    };

    let model = fr_inference::create_model(&config)?;
    info!("🧠 Using {} model {}", model.name(), model.model_id());
    let scrapers = ScraperManager::new(Arc::new(HttpFetcher::new()?));
    let agent = FinancialNewsAgent::new(
        scrapers,
        model,
        Arc::new(WkHtmlToPdf::from_env()),
        args.output_dir,
    )?;

    let analysis = agent.analyze().await?;
    println!("Analysis complete. {}", analysis.usage);

    let report = agent.render(analysis).await?;
    println!("{}. {}", report.message, report.usage);
    Ok(Outcome::Completed(report))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    fr_scrapers::logging::init_logging();
    let cli = Cli::parse();

    match cli.command.unwrap_or(Commands::Report(ReportArgs::default())) {
        Commands::Report(args) => {
            match report(args, |key| std::env::var(key).ok()).await? {
                Outcome::MissingCredential(var) => {
                    println!("Error: {} not found in environment variables", var);
                }
                Outcome::Completed(report) => info!("✅ {}", report.path.display()),
            }
        }
        Commands::Scrape(args) => {
            let manager = ScraperManager::new(Arc::new(HttpFetcher::new()?));
            handle_command(args, &manager).await?;
        }
    }

    Ok(())
}
