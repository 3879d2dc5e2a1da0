use std::fmt;

use async_trait::async_trait;

use crate::types::Completion;
use crate::Result;

#[async_trait]
pub trait CompletionModel: Send + Sync + fmt::Debug {
    /// Human readable backend name, used in logs
    fn name(&self) -> &str;

    /// Model identifier sent to the completion service
    fn model_id(&self) -> &str;

    /// Send `prompt` as a single developer-role message and return the generated text
    async fn complete(&self, prompt: &str) -> Result<Completion>;
}
