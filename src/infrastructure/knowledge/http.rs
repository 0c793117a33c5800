//! HTTP 검색 엔드포인트 기반 지식 베이스 어댑터.
//! `POST {endpoint}` 본문 `{query, top_k}`, 응답 JSON에서 텍스트를 모은다.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use url::Url;

use crate::application::config::KnowledgeBaseConfig;
use crate::infrastructure::config::resolve_api_key;
use crate::infrastructure::providers::{build_api_client, collect_text, send_json};

use super::KnowledgeProvider;

pub struct HttpKnowledgeBase {
    client: Client,
    endpoint: Url,
    api_key: Option<String>,
    top_k: u32,
}

impl HttpKnowledgeBase {
    pub fn from_config(endpoint: &str, cfg: &KnowledgeBaseConfig) -> Result<Self> {
        let endpoint = Url::parse(endpoint)
            .with_context(|| format!("invalid knowledge_base.endpoint: {endpoint}"))?;
        let api_key =
            resolve_api_key(cfg.api_key.as_deref(), cfg.api_key_env.as_deref()).credential;

        Ok(Self {
            client: build_api_client(),
            endpoint,
            api_key,
            top_k: cfg.top_k(),
        })
    }
}

#[async_trait]
impl KnowledgeProvider for HttpKnowledgeBase {
    async fn query(&self, text: &str) -> Result<String> {
        let mut request = self
            .client
            .post(self.endpoint.clone())
            .json(&json!({ "query": text, "top_k": self.top_k }));
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = send_json("knowledge base", "query knowledge base", request).await?;
        let context = collect_text(&response).trim().to_string();
        tracing::debug!(chars = context.len(), "knowledge base context retrieved");
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn posts_query_and_collects_results() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/retrieve"))
            .and(header("authorization", "Bearer kb-key"))
            .and(body_json(json!({"query": "fn main() {}", "top_k": 2})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "results": [
                    {"content": {"text": "Avoid unwrap in library code."}},
                    {"content": {"text": "Log with tracing."}}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let cfg = KnowledgeBaseConfig {
            api_key: Some("kb-key".into()),
            top_k: Some(2),
            ..Default::default()
        };
        let kb = HttpKnowledgeBase::from_config(&format!("{}/retrieve", server.uri()), &cfg)
            .unwrap();

        let context = kb.query("fn main() {}").await.unwrap();
        assert_eq!(context, "Avoid unwrap in library code.\n\nLog with tracing.");
    }

    #[tokio::test]
    async fn error_status_is_propagated() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("index unavailable"))
            .mount(&server)
            .await;

        let kb = HttpKnowledgeBase::from_config(&server.uri(), &KnowledgeBaseConfig::default())
            .unwrap();
        let err = kb.query("q").await.unwrap_err();
        assert!(format!("{err:#}").contains("index unavailable"));
    }

    #[test]
    fn invalid_endpoint_is_rejected() {
        assert!(HttpKnowledgeBase::from_config("not a url", &KnowledgeBaseConfig::default()).is_err());
    }
}
