//! 리뷰 캐시를 PR 이슈 코멘트(sentinel 코멘트)로 인코딩/디코딩한다.
//!
//! 본문 형식:
//! ```text
//! <!-- dhp-pr-review-bot-meta
//! {"reviewed": {"<path>": [<position>, ...]}}
//! -->
//! ```

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::domain::review::{IssueComment, ReviewCache};

pub const CACHE_SENTINEL: &str = "<!-- dhp-pr-review-bot-meta";
const CACHE_CLOSER: &str = "-->";

#[derive(Debug, Serialize)]
struct CacheMetaOut<'a> {
    reviewed: &'a ReviewCache,
}

#[derive(Debug, Deserialize)]
struct CacheMetaIn {
    reviewed: Option<ReviewCache>,
}

/// 본문 첫 줄이 sentinel과 정확히 일치하는지 검사한다.
pub fn is_cache_comment(body: &str) -> bool {
    let first = body.split('\n').next().unwrap_or_default();
    first.trim_end_matches('\r') == CACHE_SENTINEL
}

/// 가장 최근에 게시된 유효한 sentinel 코멘트에서 캐시를 읽는다.
/// 디코딩에 실패한 코멘트는 건너뛰고, 없으면 빈 캐시를 반환한다.
pub fn load_cache(comments: &[IssueComment]) -> ReviewCache {
    for comment in comments.iter().rev() {
        if !is_cache_comment(&comment.body) {
            continue;
        }

        match decode_cache_comment(&comment.body) {
            Ok(cache) => {
                tracing::debug!(
                    comment_id = %comment.id,
                    files = cache.len(),
                    "loaded review cache"
                );
                return cache;
            }
            Err(err) => {
                tracing::warn!(comment_id = %comment.id, "ignoring unreadable review cache: {err:#}");
            }
        }
    }

    ReviewCache::new()
}

/// sentinel 코멘트 본문을 캐시로 디코딩한다.
pub fn decode_cache_comment(body: &str) -> Result<ReviewCache> {
    if !is_cache_comment(body) {
        bail!("comment is not a review cache comment");
    }

    let payload = body
        .split_once('\n')
        .map(|(_, rest)| rest)
        .context("review cache comment has no payload")?;

    let payload = payload.trim_end();
    let payload = payload.strip_suffix(CACHE_CLOSER).unwrap_or(payload);

    let meta: CacheMetaIn =
        serde_json::from_str(payload).context("invalid review cache JSON")?;
    meta.reviewed.context("review cache JSON has no `reviewed` field")
}

/// 캐시를 새 sentinel 코멘트 본문으로 렌더링한다(2칸 들여쓰기 JSON).
pub fn render_cache_comment(cache: &ReviewCache) -> Result<String> {
    let json = serde_json::to_string_pretty(&CacheMetaOut { reviewed: cache })
        .context("failed to serialize review cache")?;
    Ok(format!("{CACHE_SENTINEL}\n{json}\n{CACHE_CLOSER}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn comment(id: &str, body: &str) -> IssueComment {
        IssueComment {
            id: id.to_string(),
            body: body.to_string(),
        }
    }

    fn cache_of(entries: &[(&str, &[u32])]) -> ReviewCache {
        entries
            .iter()
            .map(|(path, positions)| (path.to_string(), positions.to_vec()))
            .collect()
    }

    #[test]
    fn no_sentinel_yields_empty_cache() {
        let comments = vec![comment("1", "LGTM"), comment("2", "<!-- other-bot -->\n{}")];
        assert!(load_cache(&comments).is_empty());
    }

    #[test]
    fn invalid_json_yields_empty_cache() {
        let comments = vec![comment("1", "<!-- dhp-pr-review-bot-meta\n{not json\n-->")];
        assert!(load_cache(&comments).is_empty());
    }

    #[test]
    fn missing_reviewed_field_yields_empty_cache() {
        let comments = vec![comment("1", "<!-- dhp-pr-review-bot-meta\n{\"other\": 1}\n-->")];
        assert!(load_cache(&comments).is_empty());
    }

    #[test]
    fn sentinel_must_be_whole_first_line() {
        assert!(is_cache_comment("<!-- dhp-pr-review-bot-meta\n{}"));
        assert!(is_cache_comment("<!-- dhp-pr-review-bot-meta\r\n{}"));
        assert!(!is_cache_comment("<!-- dhp-pr-review-bot-metadata\n{}"));
        assert!(!is_cache_comment("hello\n<!-- dhp-pr-review-bot-meta"));
    }

    #[test]
    fn round_trip_through_comment_body() {
        let cache = cache_of(&[("src/lib.rs", &[3, 4, 9]), ("README.md", &[2])]);
        let body = render_cache_comment(&cache).unwrap();

        assert!(body.starts_with("<!-- dhp-pr-review-bot-meta\n{\n  \"reviewed\": {"));
        assert!(body.ends_with("\n-->"));
        assert_eq!(load_cache(&[comment("7", &body)]), cache);
    }

    #[test]
    fn most_recent_readable_cache_wins() {
        let old = render_cache_comment(&cache_of(&[("a.rs", &[1])])).unwrap();
        let new = render_cache_comment(&cache_of(&[("a.rs", &[1, 2])])).unwrap();
        let broken = "<!-- dhp-pr-review-bot-meta\n{oops\n-->";

        let comments = vec![
            comment("1", &old),
            comment("2", "unrelated"),
            comment("3", &new),
            comment("4", broken),
        ];

        assert_eq!(load_cache(&comments), cache_of(&[("a.rs", &[1, 2])]));
    }

    #[test]
    fn payload_without_closer_still_decodes() {
        let body = "<!-- dhp-pr-review-bot-meta\n{\"reviewed\": {\"f.py\": [3]}}";
        assert_eq!(decode_cache_comment(body).unwrap(), cache_of(&[("f.py", &[3])]));
    }
}
