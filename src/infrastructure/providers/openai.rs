//! OpenAI chat-completions 호환 API 리뷰어 어댑터.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::application::config::{ReviewerBackend, ReviewerConfig};
use crate::infrastructure::config::resolve_api_key;

use super::{ReviewProvider, build_api_client, collect_text, send_json};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4.1-mini";

pub struct OpenAiProvider {
    client: Client,
    base_url: String,
    model: String,
    credential: String,
}

impl OpenAiProvider {
    /// API key가 해석될 때만 provider를 구성한다.
    pub fn from_config(cfg: &ReviewerConfig) -> Result<Self> {
        let api_key_env = cfg
            .api_key_env
            .as_deref()
            .or(ReviewerBackend::OpenAi.default_api_key_env());
        let Some(credential) = resolve_api_key(cfg.api_key.as_deref(), api_key_env).credential
        else {
            bail!("openai reviewer: no API key (set reviewer.api_key or reviewer.api_key_env, default OPENAI_API_KEY)");
        };

        Ok(Self {
            client: build_api_client(),
            base_url: cfg
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: cfg.model.clone().unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            credential,
        })
    }
}

#[async_trait]
impl ReviewProvider for OpenAiProvider {
    fn name(&self) -> &'static str {
        "OpenAI"
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        let endpoint = format!("{}/chat/completions", self.base_url.trim_end_matches('/'));
        let payload = json!({
            "model": self.model,
            "temperature": 0.2,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        let request = self
            .client
            .post(endpoint)
            .bearer_auth(&self.credential)
            .json(&payload);

        let response = send_json(self.name(), "request chat completion", request).await?;
        let content = response
            .pointer("/choices/0/message/content")
            .map(collect_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if content.is_empty() {
            bail!("OpenAI: empty response content");
        }

        if let Some(total) = response.pointer("/usage/total_tokens").and_then(Value::as_u64) {
            tracing::debug!(model = %self.model, total_tokens = total, "openai usage");
        }
        Ok(content)
    }
}
