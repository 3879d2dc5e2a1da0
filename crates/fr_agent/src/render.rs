use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use chrono::NaiveDate;
use fr_core::{Error, RenderedDocument, Result};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

pub const REPORT_PREFIX: &str = "yonsei_financial_report";
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const WKHTMLTOPDF_VAR: &str = "WKHTMLTOPDF_PATH";

/// `<output_dir>/yonsei_financial_report_<YYYY-MM-DD>.pdf`
pub fn report_path(output_dir: &Path, date: NaiveDate) -> PathBuf {
    output_dir.join(format!("{}_{}.pdf", REPORT_PREFIX, date.format(DATE_FORMAT)))
}

#[async_trait]
pub trait ReportRenderer: Send + Sync {
    /// Converts `document` into a PDF written at `path`
    async fn render(&self, document: &RenderedDocument, path: &Path) -> Result<()>;
}

/// Pipes the markup through the `wkhtmltopdf` binary.
#[derive(Debug, Clone)]
pub struct WkHtmlToPdf {
    binary: PathBuf,
}

impl WkHtmlToPdf {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Uses `WKHTMLTOPDF_PATH` when set, otherwise `wkhtmltopdf` from `PATH`.
    pub fn from_env() -> Self {
        let binary = std::env::var_os(WKHTMLTOPDF_VAR)
            .filter(|value| !value.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("wkhtmltopdf"));
        Self { binary }
    }
}

#[async_trait]
impl ReportRenderer for WkHtmlToPdf {
    async fn render(&self, document: &RenderedDocument, path: &Path) -> Result<()> {
        let mut child = Command::new(&self.binary)
            .args(["--quiet", "--encoding", "utf-8", "-"])
            .arg(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| Error::Render(format!("failed to start {}: {}", self.binary.display(), e)))?;

        if let Some(mut stdin) = child.stdin.take() {
            // An early exit closes the pipe; the exit status below carries the reason.
            if let Err(e) = stdin.write_all(document.as_str().as_bytes()).await {
                if e.kind() != std::io::ErrorKind::BrokenPipe {
                    return Err(e.into());
                }
            }
        }

        let output = child.wait_with_output().await?;
        if !output.status.success() {
            return Err(Error::Render(format!(
                "{} exited with {}: {}",
                self.binary.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        tracing::debug!("wrote {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_path() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(
            report_path(Path::new("assets"), date),
            PathBuf::from("assets/yonsei_financial_report_2025-03-07.pdf")
        );
    }

    #[tokio::test]
    async fn test_missing_binary_is_a_render_error() {
        let renderer = WkHtmlToPdf::new("/nonexistent/bin/wkhtmltopdf");
        let document = RenderedDocument("<!DOCTYPE html><html></html>".to_string());
        let result = renderer.render(&document, Path::new("out.pdf")).await;
        assert!(matches!(result, Err(Error::Render(ref m)) if m.contains("failed to start")));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_failing_binary_is_a_render_error() {
        let renderer = WkHtmlToPdf::new("false");
        let document = RenderedDocument(String::new());
        let result = renderer.render(&document, Path::new("out.pdf")).await;
        assert!(matches!(result, Err(Error::Render(ref m)) if m.contains("exited with")));
    }
}
