//! Text generation behind a trait so handlers can be exercised without a
//! network. The production implementation talks to the Gemini REST API.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::error::{AppError, AppResult};

#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Sends a single text prompt and returns the model's text answer.
    async fn generate(&self, prompt: &str) -> AppResult<String>;
}

#[derive(Clone, Debug)]
pub struct GeminiClient {
    base_url: String,
    model: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.into(),
            api_key: api_key.into(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        if config.gemini_api_key.is_empty() {
            tracing::warn!("GEMINI_API_KEY is not set; assistant requests will fail upstream");
        }
        Self::new(
            &config.gemini_base_url,
            config.gemini_model.clone(),
            config.gemini_api_key.clone(),
            config.llm_timeout(),
        )
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

const API_KEY_HEADER: &str = "x-goog-api-key";

fn classify(e: reqwest::Error) -> AppError {
    if e.is_timeout() {
        AppError::UpstreamTimeout
    } else {
        AppError::Upstream(format!("LLM request failed: {}", e.without_url()))
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn generate(&self, prompt: &str) -> AppResult<String> {
        let response = self
            .client
            .post(self.endpoint())
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&json!({
                "contents": [{ "parts": [{ "text": prompt }] }]
            }))
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("LLM returned {status}: {body}")));
        }

        let body: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamTimeout
            } else {
                AppError::UpstreamFormat(format!(
                    "LLM response is not valid JSON: {}",
                    e.without_url()
                ))
            }
        })?;

        let text: String = body
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(AppError::UpstreamFormat("LLM response has no candidate text".into()));
        }

        tracing::debug!(model = %self.model, chars = text.len(), "LLM response received");
        Ok(text)
    }
}
