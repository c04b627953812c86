//! Minimal client for the OpenAI Responses API with structured output.
//!
//! Every call sends one prompt and a strict JSON schema and returns the
//! model's text, which is expected to be a JSON document matching the
//! schema.

use std::fmt;
use std::time::Duration;

use serde_json::{Value, json};

use crate::config::LlmConfig;
use crate::error::{FactchainError, Result};

/// HTTP client bound to one model and API key.
#[derive(Clone)]
pub struct ResponsesClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl fmt::Debug for ResponsesClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponsesClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .finish_non_exhaustive()
    }
}

impl ResponsesClient {
    /// Build a client from the LLM settings.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::MissingCredentials`] when no API key is
    /// configured and [`FactchainError::Llm`] if the HTTP client cannot be
    /// built.
    pub fn from_config(config: &LlmConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| FactchainError::MissingCredentials("OPENAI_API_KEY is not set".into()))?;
        Self::new(&config.base_url, api_key, &config.model, config.timeout_seconds)
    }

    /// Build a client for `base_url` (with or without a trailing `/v1`).
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::Llm`] if the HTTP client cannot be built.
    pub fn new(
        base_url: &str,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .user_agent(concat!("factchain/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| FactchainError::Llm(format!("failed to build HTTP client: {e}")))?;

        let base = base_url.trim_end_matches('/');
        let base = base.strip_suffix("/v1").unwrap_or(base);

        Ok(Self {
            client,
            base_url: base.to_string(),
            api_key: api_key.into(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/responses", self.base_url)
    }

    /// Send `input` with `instructions` and require output matching `schema`.
    ///
    /// Returns the raw output text.
    ///
    /// # Errors
    ///
    /// Returns [`FactchainError::Llm`] on transport failure, a non-2xx
    /// status, or a response without output text.
    pub async fn complete_json(
        &self,
        instructions: &str,
        input: &str,
        schema_name: &str,
        schema: &Value,
    ) -> Result<String> {
        let body = build_request(&self.model, instructions, input, schema_name, schema);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    FactchainError::Llm("OpenAI request timed out".into())
                } else {
                    FactchainError::Llm(format!("OpenAI request failed: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(map_http_error(status, &body_text));
        }

        let payload: Value = response
            .json()
            .await
            .map_err(|e| FactchainError::Llm(format!("invalid OpenAI response body: {e}")))?;

        extract_output_text(&payload)
            .ok_or_else(|| FactchainError::Llm("OpenAI response has no output text".into()))
    }
}

/// JSON body for `POST /v1/responses` with a strict schema.
pub fn build_request(
    model: &str,
    instructions: &str,
    input: &str,
    schema_name: &str,
    schema: &Value,
) -> Value {
    json!({
        "model": model,
        "instructions": instructions,
        "input": input,
        "text": {
            "format": {
                "type": "json_schema",
                "name": schema_name,
                "schema": schema,
                "strict": true,
            }
        }
    })
}

/// The response text: `output_text` when present, otherwise the first
/// `output[].content[]` part of type `output_text`.
pub fn extract_output_text(payload: &Value) -> Option<String> {
    if let Some(text) = payload.get("output_text").and_then(Value::as_str) {
        return Some(text.to_string());
    }
    payload
        .get("output")?
        .as_array()?
        .iter()
        .filter_map(|item| item.get("content").and_then(Value::as_array))
        .flatten()
        .find(|part| part.get("type").and_then(Value::as_str) == Some("output_text"))
        .and_then(|part| part.get("text"))
        .and_then(Value::as_str)
        .map(String::from)
}

fn map_http_error(status: reqwest::StatusCode, body: &str) -> FactchainError {
    let message = extract_error_message(body);
    match status.as_u16() {
        401 => FactchainError::Llm(format!("OpenAI authentication failed: {message}")),
        429 => FactchainError::Llm(format!("OpenAI rate limited: {message}")),
        code => FactchainError::Llm(format!("OpenAI HTTP {code}: {message}")),
    }
}

fn extract_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(String::from)
        })
        .unwrap_or_else(|| body.to_string())
}
