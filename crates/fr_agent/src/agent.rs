use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{Local, NaiveDate};
use fr_core::{
    AnalysisReport, ArticleBatch, CompletionModel, Error, Region, RenderedDocument, Result,
    UsageCounters,
};
use fr_scrapers::ScraperManager;
use tracing::{debug, info};

use crate::prompts::PromptSet;
use crate::render::{report_path, ReportRenderer, DATE_FORMAT};

/// Printed once the PDF has been written.
pub const COMPLETION_MESSAGE: &str = "Report Generation Complete";
pub const DEFAULT_OUTPUT_DIR: &str = "assets";

/// Output of the first model call together with the usage spent so far.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    pub report: AnalysisReport,
    pub usage: UsageCounters,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    pub message: &'static str,
    pub path: PathBuf,
    pub usage: UsageCounters,
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn placeholder_for(region: Region) -> &'static str {
    match region {
        Region::Us => "us_articles",
        Region::Japan => "japan_articles",
        Region::Korea => "korea_articles",
    }
}

/// Scrapes the news sources, asks the model for an analysis, then for an
/// HTML rendering of it, and writes that rendering out as a PDF.
pub struct FinancialNewsAgent {
    scrapers: ScraperManager,
    model: Arc<dyn CompletionModel>,
    renderer: Arc<dyn ReportRenderer>,
    prompts: PromptSet,
    output_dir: PathBuf,
}

impl FinancialNewsAgent {
    pub fn new(
        scrapers: ScraperManager,
        model: Arc<dyn CompletionModel>,
        renderer: Arc<dyn ReportRenderer>,
        output_dir: impl Into<PathBuf>,
    ) -> Result<Self> {
        Ok(Self {
            scrapers,
            model,
            renderer,
            prompts: PromptSet::load()?,
            output_dir: output_dir.into(),
        })
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Fills the analysis template with each region's articles as JSON.
    pub fn analysis_prompt(&self, batches: &[ArticleBatch]) -> Result<String> {
        let mut serialized = Vec::with_capacity(Region::ALL.len());
        for region in Region::ALL {
            let articles = batches
                .iter()
                .find(|batch| batch.region == region)
                .map(|batch| batch.articles.as_slice())
                .unwrap_or_default();
            serialized.push((placeholder_for(region), serde_json::to_string(articles)?));
        }

        let values: Vec<(&str, &str)> = serialized
            .iter()
            .map(|(key, value)| (*key, value.as_str()))
            .collect();
        self.prompts.analysis.render(&values)
    }

    pub fn report_prompt(&self, date: NaiveDate, analysis: &AnalysisReport) -> Result<String> {
        let date = date.format(DATE_FORMAT).to_string();
        self.prompts
            .report_html
            .render(&[("date", date.as_str()), ("analysis", analysis.as_str())])
    }

    pub async fn analyze(&self) -> Result<Analysis> {
        info!("📰 Scraping financial news");
        let batches = self.scrapers.scrape_all().await?;

        let prompt = self.analysis_prompt(&batches)?;
        debug!("analysis prompt is {} bytes", prompt.len());

        info!("🧠 Requesting market analysis from {} ({})", self.model.name(), self.model.model_id());
        let completion = self.model.complete(&prompt).await?;
        info!("✨ Analysis received ({} output tokens)", completion.usage.output_tokens);

        Ok(Analysis {
            report: AnalysisReport(completion.text),
            usage: completion.usage,
        })
    }

    pub async fn render(&self, analysis: Analysis) -> Result<Report> {
        self.render_for_date(analysis, today()).await
    }

    pub async fn render_for_date(&self, analysis: Analysis, date: NaiveDate) -> Result<Report> {
        if !self.output_dir.is_dir() {
            return Err(Error::Render(format!(
                "output directory {} does not exist",
                self.output_dir.display()
            )));
        }

        let prompt = self.report_prompt(date, &analysis.report)?;
        info!("🎨 Requesting HTML report for {}", date.format(DATE_FORMAT));
        let completion = self.model.complete(&prompt).await?;

        let mut usage = analysis.usage;
        usage += completion.usage;

        let document = RenderedDocument(completion.text);
        let path = report_path(&self.output_dir, date);
        self.renderer.render(&document, &path).await?;
        info!("📄 Report written to {}", path.display());

        Ok(Report {
            message: COMPLETION_MESSAGE,
            path,
            usage,
        })
    }

    pub async fn run(&self) -> Result<Report> {
        let analysis = self.analyze().await?;
        self.render(analysis).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use fr_core::{Article, Completion};
    use fr_inference::models::DummyModel;
    use fr_scrapers::scrapers::sources::{JAPAN_NEWS, MONEY_TODAY, YAHOO_FINANCE};
    use fr_scrapers::FixtureFetcher;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingRenderer {
        rendered: Mutex<Vec<(String, PathBuf)>>,
    }

    #[async_trait]
    impl ReportRenderer for RecordingRenderer {
        async fn render(&self, document: &RenderedDocument, path: &Path) -> Result<()> {
            self.rendered
                .lock()
                .unwrap()
                .push((document.as_str().to_string(), path.to_path_buf()));
            Ok(())
        }
    }

    fn agent_with(
        korea_html: &str,
        model: Arc<DummyModel>,
        renderer: Arc<RecordingRenderer>,
        output_dir: &Path,
    ) -> FinancialNewsAgent {
        let fetcher = FixtureFetcher::new()
            .with_page(
                YAHOO_FINANCE.metadata.url,
                include_str!("../../fr_scrapers/tests/fixtures/yahoo_finance.html"),
            )
            .with_page(
                JAPAN_NEWS.metadata.url,
                include_str!("../../fr_scrapers/tests/fixtures/japan_news.html"),
            )
            .with_page(MONEY_TODAY.metadata.url, korea_html);
        FinancialNewsAgent::new(ScraperManager::new(Arc::new(fetcher)), model, renderer, output_dir)
            .unwrap()
    }

    fn completion(text: &str, input: u64, output: u64) -> Completion {
        Completion {
            text: text.to_string(),
            usage: UsageCounters::new(input, output),
        }
    }

    #[test]
    fn test_analysis_prompt_lists_regions_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let agent = agent_with("", Arc::new(DummyModel::new()), Arc::default(), dir.path());
        let batches = vec![
            ArticleBatch::new(Region::Us, vec![Article::new("US-A", Some("us summary".to_string()))]),
            ArticleBatch::new(Region::Japan, vec![Article::new("JP-A", None)]),
            ArticleBatch::new(
                Region::Korea,
                vec![Article::new("KR-A", Some("한국 요약".to_string())), Article::new("KR-B", None)],
            ),
        ];

        let prompt = agent.analysis_prompt(&batches).unwrap();
        let positions: Vec<usize> = ["US-A", "us summary", "JP-A", "KR-A", "한국 요약", "KR-B"]
            .iter()
            .map(|needle| prompt.find(needle).unwrap_or_else(|| panic!("{} missing", needle)))
            .collect();
        let mut sorted = positions.clone();
        sorted.sort_unstable();
        assert_eq!(positions, sorted);
        assert!(prompt.contains(r#"[{"title":"JP-A","summary":null}]"#));
    }

    #[test]
    fn test_report_prompt_contains_date_and_analysis() {
        let dir = tempfile::tempdir().unwrap();
        let agent = agent_with("", Arc::new(DummyModel::new()), Arc::default(), dir.path());
        let analysis = AnalysisReport("1. **미국 시장 분석** {braces} stay".to_string());
        let date = NaiveDate::from_ymd_opt(2025, 1, 9).unwrap();

        let prompt = agent.report_prompt(date, &analysis).unwrap();
        assert!(prompt.contains("2025-01-09"));
        assert!(prompt.contains(analysis.as_str()));
    }

    #[tokio::test]
    async fn test_render_accumulates_usage_and_writes_dated_path() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(DummyModel::with_completions(vec![completion("<html></html>", 15, 25)]));
        let renderer = Arc::new(RecordingRenderer::default());
        let agent = agent_with("", model.clone(), renderer.clone(), dir.path());

        let analysis = Analysis {
            report: AnalysisReport("analysis text".to_string()),
            usage: UsageCounters::new(10, 20),
        };
        let date = NaiveDate::from_ymd_opt(2025, 12, 31).unwrap();
        let report = agent.render_for_date(analysis, date).await.unwrap();

        assert_eq!(report.message, COMPLETION_MESSAGE);
        assert_eq!(report.usage, UsageCounters::new(25, 45));
        assert_eq!(report.path, dir.path().join("yonsei_financial_report_2025-12-31.pdf"));

        let rendered = renderer.rendered.lock().unwrap().clone();
        assert_eq!(rendered, vec![("<html></html>".to_string(), report.path.clone())]);
        assert!(model.prompts()[0].contains("analysis text"));
    }

    #[tokio::test]
    async fn test_korea_layout_error_aborts_before_model_call() {
        let dir = tempfile::tempdir().unwrap();
        let model = Arc::new(DummyModel::new());
        let agent = agent_with(
            include_str!("../../fr_scrapers/tests/fixtures/money_today_missing_summary.html"),
            model.clone(),
            Arc::default(),
            dir.path(),
        );

        let result = agent.analyze().await;
        assert!(matches!(result, Err(Error::MissingElement { region: Region::Korea, .. })));
        assert!(model.prompts().is_empty());
    }

    #[tokio::test]
    async fn test_missing_output_dir_is_a_render_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("does-not-exist");
        let model = Arc::new(DummyModel::new());
        let renderer = Arc::new(RecordingRenderer::default());
        let agent = agent_with("", model.clone(), renderer.clone(), &missing);

        let analysis = Analysis {
            report: AnalysisReport("text".to_string()),
            usage: UsageCounters::default(),
        };
        assert!(matches!(agent.render(analysis).await, Err(Error::Render(_))));
        assert!(model.prompts().is_empty());
        assert!(renderer.rendered.lock().unwrap().is_empty());
        assert!(!missing.exists());
    }
}
