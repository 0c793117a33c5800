//! 리뷰 프롬프트에 덧붙일 지식 베이스 검색 계층.

pub mod http;

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::application::config::Config;

#[async_trait]
pub trait KnowledgeProvider: Send + Sync {
    /// 질의와 관련된 참고 문맥을 텍스트로 반환한다(없으면 빈 문자열).
    async fn query(&self, text: &str) -> Result<String>;
}

/// 지식 베이스가 꺼져 있을 때 쓰는 빈 구현.
pub struct NoKnowledgeBase;

#[async_trait]
impl KnowledgeProvider for NoKnowledgeBase {
    async fn query(&self, _text: &str) -> Result<String> {
        Ok(String::new())
    }
}

/// 설정의 `knowledge_base`에 맞는 구현을 생성한다.
pub fn build_knowledge_base(config: &Config) -> Result<Box<dyn KnowledgeProvider>> {
    let kb = &config.knowledge_base;
    if !kb.is_enabled() {
        return Ok(Box::new(NoKnowledgeBase));
    }

    let Some(endpoint) = kb
        .endpoint
        .as_deref()
        .map(str::trim)
        .filter(|e| !e.is_empty())
    else {
        bail!("knowledge_base.enabled is true but knowledge_base.endpoint is not set");
    };

    Ok(Box::new(http::HttpKnowledgeBase::from_config(endpoint, kb)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_knowledge_base_returns_empty_context() {
        let kb = build_knowledge_base(&Config::default()).unwrap();
        assert_eq!(kb.query("anything").await.unwrap(), "");
    }

    #[test]
    fn enabled_without_endpoint_is_a_config_error() {
        let config: Config =
            serde_json::from_str(r#"{"knowledge_base": {"enabled": true}}"#).unwrap();
        assert!(build_knowledge_base(&config).is_err());
    }
}
