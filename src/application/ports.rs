//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, HostConfig};
use crate::domain::review::{FilePatch, InlineComment, IssueComment, ReviewEvent, RunOptions};
use crate::domain::target::PullRequestRef;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// 실행 옵션(URL 또는 저장소+번호)을 PR 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn resolve(&self, options: &RunOptions) -> Result<PullRequestRef>;
}

/// 호스트 토큰 해석 결과(토큰 + 출처 라벨).
#[derive(Debug, Clone, Default)]
pub struct HostTokenResolution {
    pub token: Option<String>,
    pub source: Option<String>,
}

/// 호스트 설정(token/env)에서 런타임 토큰을 해석하는 포트.
pub trait HostTokenResolver: Send + Sync {
    fn resolve(&self, host_cfg: Option<&HostConfig>) -> HostTokenResolution;
}

/// 소스 호스팅(GitHub) 연동 추상화 포트.
#[async_trait]
pub trait HostGateway: Send + Sync {
    async fn list_files(&self) -> Result<Vec<FilePatch>>;
    async fn list_issue_comments(&self) -> Result<Vec<IssueComment>>;
    async fn list_review_requests(&self) -> Result<Vec<String>>;
    async fn create_review(
        &self,
        body: &str,
        event: ReviewEvent,
        comments: &[InlineComment],
    ) -> Result<()>;
    async fn create_issue_comment(&self, body: &str) -> Result<IssueComment>;
}

/// 대상/호스트 설정에 맞는 게이트웨이를 생성하는 팩토리 포트.
pub trait HostFactory: Send + Sync {
    fn build(
        &self,
        target: &PullRequestRef,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn HostGateway>;
}

/// LLM 리뷰어 능력: 텍스트를 받아 텍스트를 돌려준다.
#[async_trait]
pub trait Reviewer: Send + Sync {
    fn name(&self) -> &'static str;
    async fn review(&self, text: &str) -> Result<String>;
}

/// 지식 베이스 능력: 질의 텍스트에 대한 컨텍스트 문자열을 돌려준다.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn query(&self, text: &str) -> Result<String>;
}

/// 설정에 따라 리뷰어/지식 베이스 구현체를 선택하는 팩토리 포트.
pub trait AssistantFactory: Send + Sync {
    fn reviewer(&self, config: &Config) -> Result<Box<dyn Reviewer>>;
    fn knowledge_base(&self, config: &Config) -> Result<Box<dyn KnowledgeBase>>;
}

/// 리뷰 본문 마크다운 렌더링 포트.
pub trait MarkdownRenderer: Send + Sync {
    fn render_review(&self, base_body: &str, notes: &[String], comment_count: usize) -> String;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
    fn raw(&self, line: &str);
}
