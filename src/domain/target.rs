//! 리뷰 대상 GitHub PR 식별자 해석 모듈.

use anyhow::{Context, Result, bail};
use url::Url;

pub const DEFAULT_HOST: &str = "github.com";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestRef {
    pub host: String,
    pub owner: String,
    pub repo: String,
    pub number: u64,
}

impl PullRequestRef {
    /// `https://<host>/<owner>/<repo>/pull/<number>` 형식 URL을 해석한다.
    pub fn parse_url(input: &str) -> Result<Self> {
        let url = Url::parse(input.trim()).with_context(|| format!("invalid PR URL: {input}"))?;
        let host = url
            .host_str()
            .ok_or_else(|| anyhow::anyhow!("URL host is missing"))?
            .to_string();

        let segments: Vec<&str> = url
            .path_segments()
            .map(|s| s.filter(|p| !p.is_empty()).collect())
            .unwrap_or_default();

        // /owner/repo/pull/<number>
        if segments.len() < 4 || segments[2] != "pull" {
            bail!("unsupported PR URL format: {input}");
        }

        let number = parse_pr_number(segments[3])?;

        Ok(Self {
            host,
            owner: segments[0].to_string(),
            repo: segments[1].to_string(),
            number,
        })
    }

    /// CI 환경의 `owner/name` 저장소와 PR 번호 문자열을 해석한다.
    pub fn from_repo(repo: &str, number: &str) -> Result<Self> {
        let Some((owner, name)) = repo.trim().split_once('/') else {
            bail!("REPO must be in `owner/name` form, got '{repo}'");
        };
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            bail!("REPO must be in `owner/name` form, got '{repo}'");
        }

        Ok(Self {
            host: DEFAULT_HOST.to_string(),
            owner: owner.to_string(),
            repo: name.to_string(),
            number: parse_pr_number(number)?,
        })
    }

    pub fn url(&self) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            self.host, self.owner, self.repo, self.number
        )
    }
}

fn parse_pr_number(raw: &str) -> Result<u64> {
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Ok(n),
        _ => bail!("PR number must be a positive integer, got '{raw}'"),
    }
}
