//! PR 대상 해석 포트 구현 어댑터.

use anyhow::{Result, bail};

use crate::application::ports::TargetResolver;
use crate::domain::review::RunOptions;
use crate::domain::target::PullRequestRef;

/// PR URL을 우선하고, 없으면 `owner/name` + PR 번호로 대상을 만든다.
pub struct RunOptionsTargetResolver;

impl TargetResolver for RunOptionsTargetResolver {
    fn resolve(&self, options: &RunOptions) -> Result<PullRequestRef> {
        if let Some(url) = non_blank(options.url.as_deref()) {
            return PullRequestRef::parse_url(url);
        }

        match (
            non_blank(options.repo.as_deref()),
            non_blank(options.pr_number.as_deref()),
        ) {
            (Some(repo), Some(number)) => PullRequestRef::from_repo(repo, number),
            _ => bail!("missing REPO/PR_NUMBER or PR URL"),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_takes_precedence_over_repo() {
        let options = RunOptions {
            url: Some("https://github.com/acme/widgets/pull/7".into()),
            repo: Some("other/repo".into()),
            pr_number: Some("1".into()),
            ..Default::default()
        };
        let target = RunOptionsTargetResolver.resolve(&options).unwrap();
        assert_eq!(target.owner, "acme");
        assert_eq!(target.number, 7);
    }

    #[test]
    fn repo_and_number_resolve_on_github() {
        let options = RunOptions {
            repo: Some("acme/widgets".into()),
            pr_number: Some("12".into()),
            ..Default::default()
        };
        let target = RunOptionsTargetResolver.resolve(&options).unwrap();
        assert_eq!(target.url(), "https://github.com/acme/widgets/pull/12");
    }

    #[test]
    fn missing_inputs_are_reported() {
        let options = RunOptions {
            repo: Some("acme/widgets".into()),
            ..Default::default()
        };
        let err = RunOptionsTargetResolver.resolve(&options).unwrap_err();
        assert!(err.to_string().contains("missing REPO/PR_NUMBER or PR URL"));
    }
}
