//! PR 증분 리뷰 실행의 전체 오케스트레이션 유스케이스.

mod annotate;
mod context;
mod publish;

use anyhow::{Context, Result};

use crate::application::ports::{
    AssistantFactory, ConfigRepository, HostFactory, HostTokenResolver, MarkdownRenderer,
    Reporter, TargetResolver,
};
use crate::domain::cache::load_cache;
use crate::domain::review::{ReviewOutcome, RunOptions};

use annotate::build_review_draft;
use context::load_execution_context;
use publish::publish_review;

/// 리뷰 요청 확인부터 캐시 로딩, 코멘트 계산, 게시/저장까지 전체 흐름을 조율한다.
pub struct ReviewPrUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub host_token_resolver: &'a dyn HostTokenResolver,
    pub target_resolver: &'a dyn TargetResolver,
    pub host_factory: &'a dyn HostFactory,
    pub assistant_factory: &'a dyn AssistantFactory,
    pub renderer: &'a dyn MarkdownRenderer,
    pub reporter: &'a dyn Reporter,
}

impl<'a> ReviewPrUseCase<'a> {
    /// 리뷰 본 실행 진입점.
    /// load → gate → compute → post → save 순서로 한 번 실행한다.
    pub async fn execute(&self, options: RunOptions) -> Result<ReviewOutcome> {
        self.reporter.section("Session");
        self.reporter.kv(
            "Mode",
            if options.dry_run {
                "dry-run"
            } else {
                "post-review"
            },
        );
        if options.force {
            self.reporter.kv("Force", "enabled");
        }

        let ctx = load_execution_context(self, &options)?;

        if ctx.config.require_review_request() && !options.force {
            self.reporter.section("Review Requests");
            let requested = ctx
                .host
                .list_review_requests()
                .await
                .context("failed to list requested reviewers")?;
            if !requested.iter().any(|login| login.eq_ignore_ascii_case(&ctx.bot_login)) {
                self.reporter.status(
                    "Gate",
                    &format!("{} was not requested as reviewer; skipping", ctx.bot_login),
                );
                return Ok(ReviewOutcome::Skipped);
            }
            self.reporter.status("Gate", "review requested");
        }

        self.reporter.section("Fetch Files");
        let files = ctx
            .host
            .list_files()
            .await
            .context("failed to list pull request files")?;
        self.reporter.kv("Files", &files.len().to_string());
        if files.is_empty() {
            self.reporter.status("Files", "no files in pull request; nothing to review");
            return Ok(ReviewOutcome::NothingToReview);
        }

        let comments = ctx
            .host
            .list_issue_comments()
            .await
            .context("failed to list issue comments")?;
        let cache = load_cache(&comments);
        self.reporter.kv("Cached", &cache.total_positions().to_string());

        let draft = build_review_draft(self, &ctx, &files, &cache).await;
        let cache_grew = draft.new_cache.added_since(&cache) > 0;

        if !draft.has_content() && !cache_grew {
            self.reporter.status("Review", "no new comments to post");
            return Ok(ReviewOutcome::NothingToReview);
        }

        publish_review(self, &options, &ctx, &draft, cache_grew).await
    }
}
