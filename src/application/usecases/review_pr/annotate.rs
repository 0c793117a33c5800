//! 리뷰 초안 계산 단계(suggestion 고정 문구 / ai 리뷰어 결과 매핑).

use std::collections::{BTreeMap, HashMap};

use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::application::usecases::review_pr::context::{Assistants, ExecutionContext};
use crate::domain::diff::{parse_patch, position_for_new_line, reviewed_prefix, truncate_patch};
use crate::domain::findings::{group_by_line, parse_findings};
use crate::domain::policy::{
    build_file_review_prompt, generate_comments, generate_comments_with, pending_positions,
};
use crate::domain::review::{FilePatch, Position, ReviewCache, ReviewDraft, ReviewMode};

/// 모드에 맞춰 코멘트/일반 의견/새 캐시를 계산한다.
pub(super) async fn build_review_draft(
    use_case: &ReviewPrUseCase<'_>,
    ctx: &ExecutionContext,
    files: &[FilePatch],
    cache: &ReviewCache,
) -> ReviewDraft {
    match (ctx.mode, &ctx.assistants) {
        (ReviewMode::Ai, Some(assistants)) => {
            build_ai_draft(use_case, ctx, assistants, files, cache).await
        }
        _ => {
            let (comments, new_cache) =
                generate_comments(files, cache, &ctx.config.suggestion_body());
            ReviewDraft {
                comments,
                notes: Vec::new(),
                new_cache,
            }
        }
    }
}

async fn build_ai_draft(
    use_case: &ReviewPrUseCase<'_>,
    ctx: &ExecutionContext,
    assistants: &Assistants,
    files: &[FilePatch],
    cache: &ReviewCache,
) -> ReviewDraft {
    use_case.reporter.section("AI Review");

    let system_prompt = ctx.config.system_prompt();
    let max_bytes = ctx.config.max_patch_bytes();
    let mut notes = Vec::new();
    let mut bodies: HashMap<String, BTreeMap<Position, String>> = HashMap::new();
    // 리뷰어 응답을 받은 파일만 캐시에 반영한다. 실패한 파일은 다음 실행에서 다시 리뷰한다.
    let mut reviewed_files: Vec<FilePatch> = Vec::new();

    for file in files {
        let pending = pending_positions(file, cache);
        if pending.is_empty() {
            continue;
        }
        let Some(patch) = file.patch.as_deref() else {
            continue;
        };

        use_case.reporter.status(&file.filename, "reviewing");
        let prompt_patch = truncate_patch(patch, max_bytes);
        // 리뷰어가 실제로 본 라인까지만 코멘트 대상이자 리뷰 완료로 기록한다.
        let visible = FilePatch::new(
            file.filename.clone(),
            Some(reviewed_prefix(patch, max_bytes).to_string()),
            file.status,
        );
        let visible_pending = pending_positions(&visible, cache);
        if patch.len() > max_bytes {
            tracing::debug!(
                file = %file.filename,
                max_bytes,
                skipped = pending.len() - visible_pending.len(),
                "patch truncated; later lines stay pending"
            );
        }

        let knowledge = match assistants.knowledge_base.query(&prompt_patch).await {
            Ok(context) => context,
            Err(err) => {
                tracing::warn!(file = %file.filename, "knowledge base query failed: {err:#}");
                String::new()
            }
        };

        let prompt =
            build_file_review_prompt(&system_prompt, &file.filename, &prompt_patch, &knowledge);

        let response = match assistants.reviewer.review(&prompt).await {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %file.filename, "reviewer call failed: {err:#}");
                use_case.reporter.status(&file.filename, "reviewer error");
                notes.push(format!("`{}`: automated review failed ({err}).", file.filename));
                continue;
            }
        };

        let findings = match parse_findings(&response) {
            Ok(findings) => findings,
            Err(err) => {
                tracing::warn!(file = %file.filename, "unparseable reviewer response: {err:#}");
                tracing::debug!(file = %file.filename, response = %response, "raw reviewer response");
                notes.push(format!(
                    "`{}`: could not parse the automated review response.",
                    file.filename
                ));
                continue;
            }
        };

        let lines = parse_patch(patch);
        let (by_line, unbound) = group_by_line(findings.line_findings());

        let file_bodies = bodies.entry(file.filename.clone()).or_default();
        for (line_number, body) in by_line {
            match position_for_new_line(&lines, line_number) {
                Some(position) if visible_pending.contains(&position) => {
                    file_bodies.insert(position, body);
                }
                _ => notes.push(format!("`{}` line {line_number}: {body}", file.filename)),
            }
        }
        for body in unbound {
            notes.push(format!("`{}`: {body}", file.filename));
        }
        for note in findings.general_notes() {
            notes.push(format!("`{}`: {note}", file.filename));
        }

        reviewed_files.push(visible);
        use_case.reporter.status(&file.filename, "done");
    }

    let (comments, new_cache) = generate_comments_with(&reviewed_files, cache, |file, line| {
        bodies
            .get(&file.filename)
            .and_then(|by_position| by_position.get(&line.position))
            .cloned()
    });

    ReviewDraft {
        comments,
        notes,
        new_cache,
    }
}
