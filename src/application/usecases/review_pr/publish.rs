//! 리뷰 게시와 캐시 코멘트 저장 단계.

use anyhow::{Context, Result};

use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::application::usecases::review_pr::context::ExecutionContext;
use crate::domain::cache::render_cache_comment;
use crate::domain::review::{ReviewDraft, ReviewEvent, ReviewOutcome, RunOptions};

/// 리뷰를 출력(dry-run) 또는 게시하고, 게시가 성공한 뒤에만 캐시를 저장한다.
pub(super) async fn publish_review(
    use_case: &ReviewPrUseCase<'_>,
    options: &RunOptions,
    ctx: &ExecutionContext,
    draft: &ReviewDraft,
    cache_grew: bool,
) -> Result<ReviewOutcome> {
    let body = use_case.renderer.render_review(
        &ctx.config.review_body(),
        &draft.notes,
        draft.comments.len(),
    );
    let cache_body = render_cache_comment(&draft.new_cache)?;

    if options.dry_run {
        use_case.reporter.section("Dry Run: Review");
        use_case.reporter.raw(&body);
        for comment in &draft.comments {
            use_case
                .reporter
                .raw(&format!("--- {}:{} ---", comment.path, comment.position));
            use_case.reporter.raw(&comment.body);
        }
        use_case.reporter.section("Dry Run: Cache Comment");
        use_case.reporter.raw(&cache_body);
        return Ok(ReviewOutcome::DryRun {
            comments: draft.comments.len(),
        });
    }

    if draft.has_content() {
        use_case.reporter.section("Post Review");
        ctx.host
            .create_review(&body, ReviewEvent::Comment, &draft.comments)
            .await
            .context("failed to post review")?;
        use_case.reporter.status(
            "Review",
            &format!("posted {} inline comment(s)", draft.comments.len()),
        );
        tracing::info!(
            pr = %ctx.target.url(),
            comments = draft.comments.len(),
            notes = draft.notes.len(),
            "review posted"
        );
    }

    if cache_grew {
        ctx.host
            .create_issue_comment(&cache_body)
            .await
            .context("failed to save review cache comment")?;
        use_case.reporter.status(
            "Cache",
            &format!(
                "saved {} reviewed position(s) across {} file(s)",
                draft.new_cache.total_positions(),
                draft.new_cache.len()
            ),
        );
    }

    use_case.reporter.section("Done");
    Ok(ReviewOutcome::Posted {
        comments: draft.comments.len(),
    })
}
