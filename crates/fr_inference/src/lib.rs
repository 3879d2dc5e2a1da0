use std::fmt;

use fr_core::{Error, Result};
use url::Url;

pub mod models;

pub const API_KEY_VAR: &str = "OPENAI_API_KEY";
pub const BASE_URL_VAR: &str = "OPENAI_BASE_URL";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub model_name: String,
    pub base_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("model_name", &self.model_name)
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl Config {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model_name: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    pub fn with_model(mut self, model_name: impl Into<String>) -> Self {
        self.model_name = model_name.into();
        self
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key/value source. Fails with
    /// [`Error::MissingCredential`] when the API key is unset or blank.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| Error::MissingCredential(API_KEY_VAR.to_string()))?;

        let base_url = lookup(BASE_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        Url::parse(&base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;

        Ok(Self {
            api_key,
            model_name: DEFAULT_MODEL.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

pub mod prelude {
    pub use super::models::create_model;
    pub use super::Config;
    pub use fr_core::{Completion, CompletionModel, Error, Result, UsageCounters};
}

pub use models::create_model;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_missing_api_key() {
        let result = Config::from_lookup(lookup(&[]));
        assert!(matches!(result, Err(Error::MissingCredential(ref var)) if var == API_KEY_VAR));

        let result = Config::from_lookup(lookup(&[(API_KEY_VAR, "  ")]));
        assert!(matches!(result, Err(Error::MissingCredential(_))));
    }

    #[test]
    fn test_defaults_and_overrides() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "sk-test")])).unwrap();
        assert_eq!(config.api_key, "sk-test");
        assert_eq!(config.model_name, DEFAULT_MODEL);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);

        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "sk-test"),
            (BASE_URL_VAR, "http://localhost:8080/v1/"),
        ]))
        .unwrap()
        .with_model("gpt-4o");
        assert_eq!(config.base_url, "http://localhost:8080/v1");
        assert_eq!(config.model_name, "gpt-4o");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Config::from_lookup(lookup(&[(API_KEY_VAR, "sk-test"), (BASE_URL_VAR, "nope")]));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_debug_redacts_key() {
        let debug = format!("{:?}", Config::new("sk-secret"));
        assert!(!debug.contains("sk-secret"));
    }
}
