use std::fmt;

use async_trait::async_trait;
use fr_core::{Completion, CompletionModel, Error, Result, UsageCounters};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use crate::Config;

#[derive(Serialize)]
struct InputMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponsesRequest<'a> {
    model: &'a str,
    input: Vec<InputMessage<'a>>,
}

#[derive(Deserialize)]
struct ResponsesResponse {
    #[serde(default)]
    output: Vec<OutputItem>,
    usage: Option<ResponseUsage>,
    error: Option<ApiError>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum OutputItem {
    #[serde(rename = "message")]
    Message {
        #[serde(default)]
        content: Vec<ContentPart>,
    },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum ContentPart {
    #[serde(rename = "output_text")]
    OutputText { text: String },
    #[serde(other)]
    Other,
}

#[derive(Deserialize)]
struct ResponseUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ApiError,
}

#[derive(Deserialize)]
struct ApiError {
    message: String,
}

impl ResponsesResponse {
    /// Concatenates every `output_text` part of every message item.
    fn output_text(&self) -> String {
        self.output
            .iter()
            .filter_map(|item| match item {
                OutputItem::Message { content } => Some(content),
                OutputItem::Other => None,
            })
            .flatten()
            .filter_map(|part| match part {
                ContentPart::OutputText { text } => Some(text.as_str()),
                ContentPart::Other => None,
            })
            .collect()
    }
}

/// Client for the OpenAI Responses API.
pub struct OpenAiModel {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl OpenAiModel {
    pub fn new(config: &Config) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(Error::MissingCredential(crate::API_KEY_VAR.to_string()));
        }
        Ok(Self {
            client: Client::builder().build()?,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model_name.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/responses", self.base_url)
    }
}

impl fmt::Debug for OpenAiModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiModel")
            .field("client", &"<reqwest::Client>")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish()
    }
}

/// Turns a raw HTTP status and body into a completion or an inference error.
fn parse_response(status: StatusCode, body: &str) -> Result<Completion> {
    if !status.is_success() {
        let message = serde_json::from_str::<ErrorEnvelope>(body)
            .map(|envelope| envelope.error.message)
            .unwrap_or_else(|_| body.to_string());
        return Err(Error::Inference(format!(
            "completion service returned {}: {}",
            status, message
        )));
    }

    let response: ResponsesResponse = serde_json::from_str(body)?;
    if let Some(error) = &response.error {
        return Err(Error::Inference(error.message.clone()));
    }

    let usage = response
        .usage
        .as_ref()
        .map(|u| UsageCounters::new(u.input_tokens, u.output_tokens))
        .ok_or_else(|| Error::Inference("response is missing token usage".to_string()))?;

    let text = response.output_text();
    if text.is_empty() {
        return Err(Error::Inference("response contained no output text".to_string()));
    }

    Ok(Completion { text, usage })
}

#[async_trait]
impl CompletionModel for OpenAiModel {
    fn name(&self) -> &str {
        "OpenAI"
    }

    fn model_id(&self) -> &str {
        &self.model
    }

    async fn complete(&self, prompt: &str) -> Result<Completion> {
        let request = ResponsesRequest {
            model: &self.model,
            input: vec![InputMessage {
                role: "developer",
                content: prompt,
            }],
        };

        tracing::debug!("POST {} ({} prompt bytes)", self.endpoint(), prompt.len());
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        parse_response(status, &body)
    }
}
