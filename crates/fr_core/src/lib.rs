pub mod error;
pub mod models;
pub mod types;

pub use error::Error;
pub use models::CompletionModel;
pub use types::{AnalysisReport, Article, ArticleBatch, Completion, Region, RenderedDocument, UsageCounters};

pub type Result<T> = std::result::Result<T, Error>;
