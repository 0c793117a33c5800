//! GitHub REST API 연동 구현.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::HostProvider;
use crate::domain::review::{FilePatch, FileStatus, InlineComment, IssueComment, ReviewEvent};

const PER_PAGE: usize = 100;
// pulls/{n}/files는 최대 3000개 파일까지만 반환한다.
const MAX_FILE_PAGES: usize = 30;

pub struct GitHubClient {
    client: Client,
    host: String,
    owner: String,
    repo: String,
    number: u64,
    token: Option<String>,
    api_base: Option<String>,
}

impl GitHubClient {
    /// GitHub 대상 클라이언트를 생성한다.
    pub fn new(
        host: String,
        owner: String,
        repo: String,
        number: u64,
        token: Option<String>,
        api_base: Option<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            host,
            owner,
            repo,
            number,
            token,
            api_base,
        }
    }

    fn api_base(&self) -> String {
        // github.com은 공개 API, 그 외는 Enterprise 기본 경로를 사용한다.
        if let Some(base) = &self.api_base {
            return base.trim_end_matches('/').to_string();
        }
        if self.host == "github.com" {
            "https://api.github.com".to_string()
        } else {
            format!("https://{}/api/v3", self.host)
        }
    }

    fn repo_endpoint(&self) -> String {
        format!("{}/repos/{}/{}", self.api_base(), self.owner, self.repo)
    }

    fn pull_endpoint(&self) -> String {
        format!("{}/pulls/{}", self.repo_endpoint(), self.number)
    }

    fn issue_comments_endpoint(&self) -> String {
        format!("{}/issues/{}/comments", self.repo_endpoint(), self.number)
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        // 공통 헤더/인증 적용.
        let req = self
            .client
            .request(method, url)
            .header("User-Agent", "pr-review-bot")
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");

        if let Some(token) = &self.token {
            req.bearer_auth(token)
        } else {
            req
        }
    }

    async fn send(&self, request: RequestBuilder, action: &str) -> Result<String> {
        let resp = request
            .send()
            .await
            .with_context(|| format!("github: failed to {action}"))?;

        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("github: failed to read {action} body"))?;

        if !status.is_success() {
            anyhow::bail!("github: failed to {action} ({status}): {body}");
        }
        Ok(body)
    }

    /// 페이지 크기보다 적게 돌아올 때까지 목록 API를 순회한다.
    /// `max_pages`에 닿으면 남은 항목을 가져오지 않고 경고를 남긴다.
    async fn get_paginated<T: DeserializeOwned>(
        &self,
        url: &str,
        action: &str,
        max_pages: Option<usize>,
    ) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut page = 1;

        loop {
            let request = self
                .request(Method::GET, url.to_string())
                .query(&[("per_page", PER_PAGE), ("page", page)]);
            let body = self.send(request, action).await?;
            let items: Vec<T> = serde_json::from_str(&body)
                .with_context(|| format!("github: invalid JSON while trying to {action}"))?;

            let count = items.len();
            out.extend(items);
            if count < PER_PAGE {
                break;
            }
            if max_pages.is_some_and(|max| page >= max) {
                tracing::warn!(
                    action,
                    pages = page,
                    fetched = out.len(),
                    "github: pagination limit reached; remaining items were not fetched"
                );
                break;
            }
            page += 1;
        }

        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct PullFileResponse {
    filename: String,
    status: String,
    #[serde(default)]
    patch: Option<String>,
}

#[derive(Debug, Deserialize)]
struct IssueCommentResponse {
    id: u64,
    #[serde(default)]
    body: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RequestedReviewersResponse {
    #[serde(default)]
    users: Vec<UserResponse>,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    login: String,
}

impl From<IssueCommentResponse> for IssueComment {
    fn from(c: IssueCommentResponse) -> Self {
        IssueComment {
            id: c.id.to_string(),
            body: c.body.unwrap_or_default(),
        }
    }
}

#[async_trait]
impl HostProvider for GitHubClient {
    async fn list_files(&self) -> Result<Vec<FilePatch>> {
        let url = format!("{}/files", self.pull_endpoint());
        let files: Vec<PullFileResponse> = self
            .get_paginated(&url, "list PR files", Some(MAX_FILE_PAGES))
            .await?;

        Ok(files
            .into_iter()
            .map(|f| FilePatch::new(f.filename, f.patch, FileStatus::parse(&f.status)))
            .collect())
    }

    async fn list_issue_comments(&self) -> Result<Vec<IssueComment>> {
        // 가장 최근 캐시 코멘트가 마지막 페이지에 있으므로 끝까지 읽는다.
        let comments: Vec<IssueCommentResponse> = self
            .get_paginated(&self.issue_comments_endpoint(), "list comments", None)
            .await?;
        Ok(comments.into_iter().map(IssueComment::from).collect())
    }

    async fn list_review_requests(&self) -> Result<Vec<String>> {
        let url = format!("{}/requested_reviewers", self.pull_endpoint());
        let body = self
            .send(self.request(Method::GET, url), "list requested reviewers")
            .await?;
        let reviewers: RequestedReviewersResponse = serde_json::from_str(&body)
            .context("github: invalid requested reviewers JSON")?;
        Ok(reviewers.users.into_iter().map(|u| u.login).collect())
    }

    async fn create_review(
        &self,
        body: &str,
        event: ReviewEvent,
        comments: &[InlineComment],
    ) -> Result<()> {
        let url = format!("{}/reviews", self.pull_endpoint());
        let payload = json!({
            "body": body,
            "event": event.code(),
            "comments": comments,
        });
        self.send(self.request(Method::POST, url).json(&payload), "create review")
            .await?;
        Ok(())
    }

    async fn create_issue_comment(&self, body: &str) -> Result<IssueComment> {
        let response_body = self
            .send(
                self.request(Method::POST, self.issue_comments_endpoint())
                    .json(&json!({ "body": body })),
                "create comment",
            )
            .await?;

        let comment: IssueCommentResponse = serde_json::from_str(&response_body)
            .context("github: invalid create-comment JSON")?;
        Ok(comment.into())
    }
}
