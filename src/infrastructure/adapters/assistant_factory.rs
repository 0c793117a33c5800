//! 리뷰어/지식 베이스 포트 구현 어댑터.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::Config;
use crate::application::ports::{AssistantFactory, KnowledgeBase, Reviewer};
use crate::infrastructure::{knowledge, providers};

/// 설정 기반 리뷰어/지식 베이스 팩토리 어댑터.
pub struct AssistantFactoryAdapter;

impl AssistantFactory for AssistantFactoryAdapter {
    fn reviewer(&self, config: &Config) -> Result<Box<dyn Reviewer>> {
        let inner = providers::build_reviewer(config)?;
        Ok(Box::new(ReviewerAdapter { inner }))
    }

    fn knowledge_base(&self, config: &Config) -> Result<Box<dyn KnowledgeBase>> {
        let inner = knowledge::build_knowledge_base(config)?;
        Ok(Box::new(KnowledgeBaseAdapter { inner }))
    }
}

/// 인프라 ReviewProvider를 애플리케이션 포트로 감싸는 래퍼.
struct ReviewerAdapter {
    inner: Box<dyn providers::ReviewProvider>,
}

#[async_trait]
impl Reviewer for ReviewerAdapter {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn review(&self, text: &str) -> Result<String> {
        self.inner.review(text).await
    }
}

struct KnowledgeBaseAdapter {
    inner: Box<dyn knowledge::KnowledgeProvider>,
}

#[async_trait]
impl KnowledgeBase for KnowledgeBaseAdapter {
    async fn query(&self, text: &str) -> Result<String> {
        self.inner.query(text).await
    }
}
