//! 도메인 정책: 증분 리뷰 대상 위치 계산과 inline 코멘트 생성 규칙.

use std::collections::HashSet;

use crate::domain::diff::{DiffLine, LineKind, added_positions, parse_patch};
use crate::domain::review::{FilePatch, InlineComment, Position, ReviewCache};

pub const DEFAULT_SUGGESTION_BODY: &str =
    "💡 Review suggestion by dhp-pr-review-bot: Consider reviewing this line.";

/// 새로 추가된 모든 라인에 고정 제안 문구를 다는 기본 코멘트 생성.
pub fn generate_comments(
    files: &[FilePatch],
    cache: &ReviewCache,
    suggestion_body: &str,
) -> (Vec<InlineComment>, ReviewCache) {
    generate_comments_with(files, cache, |_, _| Some(suggestion_body.to_string()))
}

/// 아직 리뷰하지 않은 추가 라인을 순회하며 `annotate`가 돌려준 본문으로 코멘트를 만든다.
///
/// - 새 캐시는 입력 캐시 전체에서 시작하므로 이번 실행에 없는 파일 항목도 유지된다.
/// - 새 추가 위치는 코멘트 생성 여부와 관계없이 모두 캐시에 기록된다.
/// - 삭제된 파일, patch가 없는 파일은 코멘트/캐시 항목을 만들지 않는다.
pub fn generate_comments_with<F>(
    files: &[FilePatch],
    cache: &ReviewCache,
    mut annotate: F,
) -> (Vec<InlineComment>, ReviewCache)
where
    F: FnMut(&FilePatch, &DiffLine<'_>) -> Option<String>,
{
    let mut comments = Vec::new();
    let mut new_cache = cache.clone();

    for file in files {
        let Some(patch) = file.patch.as_deref().filter(|_| file.is_reviewable()) else {
            continue;
        };

        let reviewed: HashSet<Position> = cache.positions(&file.filename).iter().copied().collect();
        let entry = new_cache.entry_mut(&file.filename);
        dedup_in_place(entry);

        for line in parse_patch(patch) {
            if line.kind != LineKind::Added || reviewed.contains(&line.position) {
                continue;
            }
            entry.push(line.position);

            if let Some(body) = annotate(file, &line) {
                comments.push(InlineComment {
                    path: file.filename.clone(),
                    position: line.position,
                    body,
                });
            }
        }
    }

    (comments, new_cache)
}

/// 파일에서 아직 리뷰하지 않은 추가 라인 위치.
pub fn pending_positions(file: &FilePatch, cache: &ReviewCache) -> Vec<Position> {
    let Some(patch) = file.patch.as_deref().filter(|_| file.is_reviewable()) else {
        return Vec::new();
    };

    let reviewed = cache.positions(&file.filename);
    added_positions(patch)
        .into_iter()
        .filter(|p| !reviewed.contains(p))
        .collect()
}

/// 파일 하나에 대한 리뷰어 프롬프트를 구성한다.
/// 리뷰어는 새 파일 라인 번호 기준 지적 사항을 JSON으로 돌려줘야 한다.
pub fn build_file_review_prompt(
    system_prompt: &str,
    filename: &str,
    patch: &str,
    knowledge: &str,
) -> String {
    let mut out = String::new();
    out.push_str("System instructions:\n");
    out.push_str(system_prompt.trim());
    out.push_str("\n\n");

    let knowledge = knowledge.trim();
    if !knowledge.is_empty() {
        out.push_str("Relevant project knowledge:\n");
        out.push_str(knowledge);
        out.push_str("\n\n");
    }

    out.push_str(&format!("Review the following diff of file '{filename}'.\n"));
    out.push_str("Focus on the added lines: bugs, security vulnerabilities, readability, performance, maintainability.\n");
    out.push_str("Comments on deleted lines belong in overall_review_comments, never on a line number.\n\n");
    out.push_str("```diff\n");
    out.push_str(patch);
    out.push_str("\n```\n\n");
    out.push_str(FINDINGS_FORMAT);
    out
}

const FINDINGS_FORMAT: &str = r#"Respond with JSON only, in this format (every key present, empty arrays allowed).
`line_number` is the line number in the NEW version of the file.

```json
{
  "pr_summary": "Summary of this file's change.",
  "improvement_suggestions": ["Suggestion"],
  "code_issues": [
    {"file": "path", "line_number": 123, "comment": "Issue", "category": "Bug/Readability/Performance/Maintainability"}
  ],
  "security_vulnerabilities": [
    {"file": "path", "line_number": 45, "comment": "Vulnerability", "severity": "High/Medium/Low", "category": "Injection/XSS/Auth/Misconfiguration"}
  ],
  "overall_review_comments": "Overall comments."
}
```"#;

/// 중복 항목만 지운다. 리뷰 완료 위치 집합은 줄지 않는다.
fn dedup_in_place(positions: &mut Vec<Position>) {
    let mut seen = HashSet::new();
    positions.retain(|p| seen.insert(*p));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::review::FileStatus;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "@@ -1,2 +1,3 @@\n-foo\n+bar\n+baz\n context";

    fn file(name: &str, patch: &str) -> FilePatch {
        FilePatch::new(name, Some(patch.to_string()), FileStatus::Modified)
    }

    fn cache_of(entries: &[(&str, &[u32])]) -> ReviewCache {
        entries
            .iter()
            .map(|(path, positions)| (path.to_string(), positions.to_vec()))
            .collect()
    }

    fn positions(comments: &[InlineComment]) -> Vec<(String, u32)> {
        comments
            .iter()
            .map(|c| (c.path.clone(), c.position))
            .collect()
    }

    #[test]
    fn empty_cache_comments_every_added_line() {
        let (comments, new_cache) =
            generate_comments(&[file("f.py", SAMPLE)], &ReviewCache::new(), "check");

        assert_eq!(
            positions(&comments),
            vec![("f.py".to_string(), 3), ("f.py".to_string(), 4)]
        );
        assert!(comments.iter().all(|c| c.body == "check"));
        assert_eq!(new_cache, cache_of(&[("f.py", &[3, 4])]));
    }

    #[test]
    fn cached_positions_are_skipped_and_appended_after() {
        let cache = cache_of(&[("f.py", &[3])]);
        let (comments, new_cache) = generate_comments(&[file("f.py", SAMPLE)], &cache, "check");

        assert_eq!(positions(&comments), vec![("f.py".to_string(), 4)]);
        assert_eq!(new_cache.positions("f.py"), &[3, 4]);
    }

    #[test]
    fn second_run_with_new_cache_is_idempotent() {
        let files = vec![
            file("f.py", SAMPLE),
            file("g.rs", "@@ -0,0 +1,2 @@\n+one\n+two"),
        ];
        let (first, cache) = generate_comments(&files, &ReviewCache::new(), "check");
        assert_eq!(first.len(), 4);

        let (second, cache_again) = generate_comments(&files, &cache, "check");
        assert!(second.is_empty());
        assert_eq!(cache_again, cache);
    }

    #[test]
    fn removed_and_patchless_files_contribute_nothing() {
        let files = vec![
            FilePatch::new("gone.rs", Some("+x".into()), FileStatus::Removed),
            FilePatch::new("bin.png", None, FileStatus::Added),
            FilePatch::new("empty.rs", Some(String::new()), FileStatus::Modified),
        ];
        let (comments, new_cache) = generate_comments(&files, &ReviewCache::new(), "check");

        assert!(comments.is_empty());
        assert!(new_cache.is_empty());
    }

    #[test]
    fn entries_for_absent_files_are_carried_forward() {
        let cache = cache_of(&[("old.rs", &[2, 5]), ("f.py", &[3])]);
        let (_, new_cache) = generate_comments(&[file("f.py", SAMPLE)], &cache, "check");

        assert_eq!(new_cache.positions("old.rs"), &[2, 5]);
        assert_eq!(new_cache.positions("f.py"), &[3, 4]);
    }

    #[test]
    fn double_plus_lines_are_never_commented() {
        let patch = "+++ b/f.py\n@@ -0,0 +1,2 @@\n+a\n++b";
        let (comments, _) = generate_comments(&[file("f.py", patch)], &ReviewCache::new(), "x");
        assert_eq!(positions(&comments), vec![("f.py".to_string(), 3)]);
    }

    #[test]
    fn annotate_none_still_marks_position_reviewed() {
        let (comments, new_cache) =
            generate_comments_with(&[file("f.py", SAMPLE)], &ReviewCache::new(), |_, line| {
                (line.position == 4).then(|| format!("about {}", line.text))
            });

        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].body, "about +baz");
        assert_eq!(new_cache.positions("f.py"), &[3, 4]);
    }

    #[test]
    fn duplicate_cached_positions_are_collapsed() {
        let cache = cache_of(&[("f.py", &[3, 3])]);
        let (_, new_cache) = generate_comments(&[file("f.py", SAMPLE)], &cache, "x");
        assert_eq!(new_cache.positions("f.py"), &[3, 4]);
    }

    #[test]
    fn prompt_includes_knowledge_only_when_present() {
        let with_kb = build_file_review_prompt("be strict", "f.py", SAMPLE, "use tabs");
        assert!(with_kb.contains("Relevant project knowledge:\nuse tabs"));
        assert!(with_kb.contains("```diff\n@@ -1,2 +1,3 @@"));

        let without_kb = build_file_review_prompt("be strict", "f.py", SAMPLE, "  ");
        assert!(!without_kb.contains("Relevant project knowledge"));
        assert!(without_kb.contains("\"line_number\""));
    }

    #[test]
    fn pending_positions_excludes_reviewed_lines() {
        let f = file("f.py", SAMPLE);
        assert_eq!(pending_positions(&f, &ReviewCache::new()), vec![3, 4]);
        assert_eq!(pending_positions(&f, &cache_of(&[("f.py", &[3, 4])])), Vec::<u32>::new());
    }
}
