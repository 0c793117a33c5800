//! 소스 호스팅 추상화 계층.
//! 호스트별 REST 구현을 공통 인터페이스로 묶는다.

pub mod github;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::HostConfig;
use crate::domain::review::{FilePatch, InlineComment, IssueComment, ReviewEvent};
use crate::domain::target::PullRequestRef;

#[async_trait]
pub trait HostProvider: Send + Sync {
    /// PR 변경 파일과 파일별 patch 조회
    async fn list_files(&self) -> Result<Vec<FilePatch>>;
    /// 이슈 코멘트를 생성 순서대로 조회
    async fn list_issue_comments(&self) -> Result<Vec<IssueComment>>;
    /// 요청된 리뷰어 login 조회
    async fn list_review_requests(&self) -> Result<Vec<String>>;
    /// inline 코멘트를 포함한 일괄 리뷰 생성
    async fn create_review(
        &self,
        body: &str,
        event: ReviewEvent,
        comments: &[InlineComment],
    ) -> Result<()>;
    /// 이슈 코멘트 생성
    async fn create_issue_comment(&self, body: &str) -> Result<IssueComment>;
}

pub fn build_host_client(
    target: &PullRequestRef,
    host_cfg: Option<&HostConfig>,
    token: Option<String>,
) -> Box<dyn HostProvider> {
    let api_base = host_cfg.and_then(|h| h.api_base.clone());

    Box::new(github::GitHubClient::new(
        target.host.clone(),
        target.owner.clone(),
        target.repo.clone(),
        target.number,
        token,
        api_base,
    ))
}
