pub mod agent;
pub mod prompts;
pub mod render;

pub use agent::{today, Analysis, FinancialNewsAgent, Report, COMPLETION_MESSAGE, DEFAULT_OUTPUT_DIR};
pub use prompts::{PromptSet, PromptTemplate};
pub use render::{report_path, ReportRenderer, WkHtmlToPdf};
