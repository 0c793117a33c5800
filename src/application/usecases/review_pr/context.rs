//! 리뷰 실행 컨텍스트(설정/대상/호스트/리뷰어) 준비 단계.
//!
//! 여기서의 모든 실패는 설정 오류이며 호스트 API 호출 전에 발생한다.

use anyhow::{Context, Result, bail};

use crate::application::config::Config;
use crate::application::ports::{HostGateway, KnowledgeBase, Reviewer};
use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::domain::review::{ReviewMode, RunOptions};
use crate::domain::target::PullRequestRef;

/// ai 모드에서만 구성되는 리뷰어/지식 베이스 묶음.
pub(super) struct Assistants {
    pub reviewer: Box<dyn Reviewer>,
    pub knowledge_base: Box<dyn KnowledgeBase>,
}

/// 리뷰 유스케이스 전 구간에서 공유되는 실행 상태.
pub(super) struct ExecutionContext {
    pub config: Config,
    pub target: PullRequestRef,
    pub host: Box<dyn HostGateway>,
    pub mode: ReviewMode,
    pub bot_login: String,
    pub assistants: Option<Assistants>,
}

/// 설정 로딩, 대상 해석, 토큰/리뷰어 구성을 선행한다.
pub(super) fn load_execution_context(
    use_case: &ReviewPrUseCase<'_>,
    options: &RunOptions,
) -> Result<ExecutionContext> {
    use_case.reporter.section("Load Config");
    let config = use_case
        .config_repo
        .load()
        .context("failed to load pr-review-bot config")?;

    let target = use_case
        .target_resolver
        .resolve(options)
        .context("failed to resolve target pull request")?;

    let host_cfg = config.host_config(&target.host);
    let token = use_case.host_token_resolver.resolve(host_cfg.as_ref());

    if !options.dry_run && token.token.is_none() {
        bail!(
            "missing host token for '{}'. Configure hosts.{}.token or hosts.{}.token_env (default GITHUB_TOKEN), or use --dry-run",
            target.host,
            target.host,
            target.host,
        );
    }

    let mode = options.mode.unwrap_or_else(|| config.mode());
    let bot_login = options
        .bot_login
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(ToString::to_string)
        .unwrap_or_else(|| config.bot_login());

    let assistants = match mode {
        ReviewMode::Suggestion => None,
        ReviewMode::Ai => Some(Assistants {
            reviewer: use_case
                .assistant_factory
                .reviewer(&config)
                .context("failed to configure reviewer for ai mode")?,
            knowledge_base: use_case
                .assistant_factory
                .knowledge_base(&config)
                .context("failed to configure knowledge base")?,
        }),
    };

    use_case.reporter.kv("Target", &target.url());
    use_case.reporter.kv("Mode", mode.code());
    use_case.reporter.kv("Bot", &bot_login);
    if let Some(source) = &token.source {
        use_case.reporter.kv("Token", source);
    }
    if let Some(assistants) = &assistants {
        use_case.reporter.kv("Reviewer", assistants.reviewer.name());
    }

    let host = use_case
        .host_factory
        .build(&target, host_cfg.as_ref(), token.token);

    Ok(ExecutionContext {
        config,
        target,
        host,
        mode,
        bot_login,
        assistants,
    })
}
