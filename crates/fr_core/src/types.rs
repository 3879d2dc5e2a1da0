use std::fmt;
use std::ops::{Add, AddAssign};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the news sources scraped on every run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Us,
    Japan,
    Korea,
}

impl Region {
    /// Fetch order used by the pipeline.
    pub const ALL: [Region; 3] = [Region::Us, Region::Japan, Region::Korea];

    pub fn code(&self) -> &'static str {
        match self {
            Region::Us => "us",
            Region::Japan => "jp",
            Region::Korea => "kr",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Us => "US",
            Region::Japan => "Japan",
            Region::Korea => "Korea",
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Region {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "us" | "usa" => Ok(Region::Us),
            "jp" | "japan" => Ok(Region::Japan),
            "kr" | "korea" => Ok(Region::Korea),
            other => Err(format!("Unknown region: {} (expected us, jp or kr)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub summary: Option<String>,
}

impl Article {
    pub fn new(title: impl Into<String>, summary: Option<String>) -> Self {
        Self {
            title: title.into(),
            summary,
        }
    }
}

/// Articles scraped from one region's listing page, in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleBatch {
    pub region: Region,
    pub articles: Vec<Article>,
}

impl ArticleBatch {
    pub fn new(region: Region, articles: Vec<Article>) -> Self {
        Self { region, articles }
    }

    pub fn len(&self) -> usize {
        self.articles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.articles.is_empty()
    }
}

/// Text of the first model call. Never parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisReport(pub String);

impl AnalysisReport {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Markup returned by the second model call, handed verbatim to the renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument(pub String);

impl RenderedDocument {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageCounters {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

impl UsageCounters {
    pub fn new(input_tokens: u64, output_tokens: u64) -> Self {
        Self {
            input_tokens,
            output_tokens,
        }
    }
}

impl Add for UsageCounters {
    type Output = UsageCounters;

    fn add(self, rhs: UsageCounters) -> UsageCounters {
        UsageCounters {
            input_tokens: self.input_tokens + rhs.input_tokens,
            output_tokens: self.output_tokens + rhs.output_tokens,
        }
    }
}

impl AddAssign for UsageCounters {
    fn add_assign(&mut self, rhs: UsageCounters) {
        *self = *self + rhs;
    }
}

impl fmt::Display for UsageCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Total Input Tokens: {}, Total Output Tokens: {}",
            self.input_tokens, self.output_tokens
        )
    }
}

/// Result of a single completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub usage: UsageCounters,
}
