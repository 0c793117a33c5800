//! Anthropic messages API 리뷰어 어댑터.

use anyhow::{Result, bail};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;

use crate::application::config::{ReviewerBackend, ReviewerConfig};
use crate::infrastructure::config::resolve_api_key;

use super::{ReviewProvider, build_api_client, collect_text, send_json};

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";
const DEFAULT_MODEL: &str = "claude-3-7-sonnet-latest";
const API_VERSION: &str = "2023-06-01";

pub struct AnthropicProvider {
    client: Client,
    base_url: String,
    model: String,
    credential: String,
}

impl AnthropicProvider {
    pub fn from_config(cfg: &ReviewerConfig) -> Result<Self> {
        let api_key_env = cfg
            .api_key_env
            .as_deref()
            .or(ReviewerBackend::Anthropic.default_api_key_env());
        let Some(credential) = resolve_api_key(cfg.api_key.as_deref(), api_key_env).credential
        else {
            bail!("anthropic reviewer: no API key (set reviewer.api_key or reviewer.api_key_env, default ANTHROPIC_API_KEY)");
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
impl ReviewProvider for AnthropicProvider {
    fn name(&self) -> &'static str {
        "Claude"
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        let endpoint = format!("{}/messages", self.base_url.trim_end_matches('/'));
        let payload = json!({
            "model": self.model,
            "max_tokens": 2048,
            "temperature": 0.2,
            "messages": [
                { "role": "user", "content": prompt }
            ]
        });

        // API key(sk-ant-...)와 OAuth/Bearer 토큰을 모두 수용한다.
        let request = if self.credential.starts_with("sk-ant-") {
            self.client
                .post(endpoint)
                .header("x-api-key", &self.credential)
        } else {
            self.client.post(endpoint).bearer_auth(&self.credential)
        };
        let request = request
            .header("anthropic-version", API_VERSION)
            .json(&payload);

        let response = send_json(self.name(), "request Anthropic API", request).await?;
        let content = response
            .get("content")
            .map(collect_text)
            .unwrap_or_default()
            .trim()
            .to_string();
        if content.is_empty() {
            bail!("Claude: empty response content");
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn api_key_goes_in_x_api_key_header() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .and(header("x-api-key", "sk-ant-test"))
            .and(header("anthropic-version", API_VERSION))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": [{"type": "text", "text": "looks fine"}]
            })))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::from_config(&ReviewerConfig {
            api_base: Some(server.uri()),
            api_key: Some("sk-ant-test".into()),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(provider.review("hi").await.unwrap(), "looks fine");
    }

    #[tokio::test]
    async fn server_errors_carry_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/messages"))
            .respond_with(ResponseTemplate::new(529).set_body_string("overloaded"))
            .mount(&server)
            .await;

        let provider = AnthropicProvider::from_config(&ReviewerConfig {
            api_base: Some(server.uri()),
            api_key: Some("token".into()),
            ..Default::default()
        })
        .unwrap();

        let err = provider.review("hi").await.unwrap_err();
        assert!(format!("{err:#}").contains("overloaded"));
    }
}
