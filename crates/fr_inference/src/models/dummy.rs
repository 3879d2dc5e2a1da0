use std::collections::VecDeque;
use std::fmt;
use std::sync::Mutex;

use fr_core::{Completion, CompletionModel, Error, Result, UsageCounters};

/// Returned once the scripted completions run out.
pub const ECHO_MARKER: &str = "dummy completion";

/// Offline model: replays scripted completions in order and remembers every prompt.
#[derive(Default)]
pub struct DummyModel {
    script: Mutex<VecDeque<Completion>>,
    prompts: Mutex<Vec<String>>,
}

impl fmt::Debug for DummyModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DummyModel").finish()
    }
}

impl DummyModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_completions(completions: impl IntoIterator<Item = Completion>) -> Self {
        Self {
            script: Mutex::new(completions.into_iter().collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl CompletionModel for DummyModel {
    fn name(&self) -> &str {
        "Dummy"
    }

    fn model_id(&self) -> &str {
        super::DUMMY_MODEL
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        self.prompts
            .lock()
            .map_err(|_| Error::Inference("dummy model state poisoned".to_string()))?
            .push(prompt.to_string());

        let next = self
            .script
            .lock()
            .map_err(|_| Error::Inference("dummy model state poisoned".to_string()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| Completion {
            text: ECHO_MARKER.to_string(),
            usage: UsageCounters::default(),
        }))
    }
}
