use std::sync::Arc;

use fr_core::{CompletionModel, Result};

use crate::Config;

pub mod dummy;
pub mod openai;

pub use dummy::DummyModel;
pub use openai::OpenAiModel;

/// Model name that selects [`DummyModel`] instead of the remote service.
pub const DUMMY_MODEL: &str = "dummy";

pub fn create_model(config: &Config) -> Result<Arc<dyn CompletionModel>> {
    if config.model_name == DUMMY_MODEL {
        return Ok(Arc::new(DummyModel::new()));
    }
    Ok(Arc::new(OpenAiModel::new(config)?))
}
