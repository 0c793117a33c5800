//! 호스트 게이트웨이 포트 구현 어댑터.

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::HostConfig;
use crate::application::ports::{HostFactory, HostGateway};
use crate::domain::review::{FilePatch, InlineComment, IssueComment, ReviewEvent};
use crate::domain::target::PullRequestRef;
use crate::infrastructure::vcs;

/// 호스트 게이트웨이 팩토리 어댑터.
pub struct HostFactoryAdapter;

impl HostFactory for HostFactoryAdapter {
    fn build(
        &self,
        target: &PullRequestRef,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn HostGateway> {
        Box::new(HostGatewayAdapter {
            inner: vcs::build_host_client(target, host_cfg, token),
        })
    }
}

/// 인프라 HostProvider를 애플리케이션 포트로 감싸는 래퍼.
struct HostGatewayAdapter {
    inner: Box<dyn vcs::HostProvider>,
}

#[async_trait]
impl HostGateway for HostGatewayAdapter {
    async fn list_files(&self) -> Result<Vec<FilePatch>> {
        self.inner.list_files().await
    }

    async fn list_issue_comments(&self) -> Result<Vec<IssueComment>> {
        self.inner.list_issue_comments().await
    }

    async fn list_review_requests(&self) -> Result<Vec<String>> {
        self.inner.list_review_requests().await
    }

    async fn create_review(
        &self,
        body: &str,
        event: ReviewEvent,
        comments: &[InlineComment],
    ) -> Result<()> {
        self.inner.create_review(body, event, comments).await
    }

    async fn create_issue_comment(&self, body: &str) -> Result<IssueComment> {
        self.inner.create_issue_comment(body).await
    }
}
