//! 리뷰 도메인 엔티티/값 객체.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// diff 본문 내 1-based 라인 위치(호스트 inline 코멘트 주소 체계).
pub type Position = u32;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub url: Option<String>,
    pub repo: Option<String>,
    pub pr_number: Option<String>,
    pub bot_login: Option<String>,
    pub mode: Option<ReviewMode>,
    pub dry_run: bool,
    pub force: bool,
}

/// 호스트가 보고하는 파일 변경 상태.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
    Copied,
    Changed,
    Unchanged,
    Other,
}

impl FileStatus {
    /// API 문자열을 상태값으로 변환한다. 알 수 없는 값은 `Other`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "added" => Self::Added,
            "modified" => Self::Modified,
            "removed" => Self::Removed,
            "renamed" => Self::Renamed,
            "copied" => Self::Copied,
            "changed" => Self::Changed,
            "unchanged" => Self::Unchanged,
            _ => Self::Other,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
            Self::Renamed => "renamed",
            Self::Copied => "copied",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::Other => "other",
        }
    }
}

/// PR 내 파일 하나의 patch 레코드.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePatch {
    pub filename: String,
    pub patch: Option<String>,
    pub status: FileStatus,
}

impl FilePatch {
    pub fn new(filename: impl Into<String>, patch: Option<String>, status: FileStatus) -> Self {
        Self {
            filename: filename.into(),
            patch,
            status,
        }
    }

    /// 새 revision 쪽에 코멘트를 달 수 있는 patch가 있는지 여부.
    pub fn is_reviewable(&self) -> bool {
        self.status != FileStatus::Removed
            && self.patch.as_deref().is_some_and(|p| !p.is_empty())
    }
}

/// PR 이슈 코멘트(리뷰 코멘트 아님).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueComment {
    pub id: String,
    pub body: String,
}

/// 일괄 리뷰로 제출할 inline 코멘트.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InlineComment {
    pub path: String,
    pub position: Position,
    pub body: String,
}

/// 리뷰 제출 이벤트 종류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewEvent {
    Comment,
}

impl ReviewEvent {
    pub fn code(self) -> &'static str {
        match self {
            Self::Comment => "COMMENT",
        }
    }
}

/// 파일 경로별로 이미 리뷰한 diff 위치 목록.
/// 한 PR의 수명 동안 파일별 목록은 추가만 된다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReviewCache(BTreeMap<String, Vec<Position>>);

impl ReviewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn positions(&self, path: &str) -> &[Position] {
        self.0.get(path).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, path: &str, position: Position) -> bool {
        self.positions(path).contains(&position)
    }

    pub fn insert(&mut self, path: impl Into<String>, positions: Vec<Position>) {
        self.0.insert(path.into(), positions);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Position>)> {
        self.0.iter()
    }

    pub(crate) fn entry_mut(&mut self, path: &str) -> &mut Vec<Position> {
        self.0.entry(path.to_string()).or_default()
    }

    /// 전체 파일에 걸친 리뷰 완료 위치 수.
    pub fn total_positions(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// `older`에 없던 위치 수. 중복 제거로 줄어든 항목은 세지 않는다.
    pub fn added_since(&self, older: &ReviewCache) -> usize {
        self.0
            .iter()
            .map(|(path, positions)| {
                positions
                    .iter()
                    .filter(|position| !older.contains(path, **position))
                    .count()
            })
            .sum()
    }
}

impl FromIterator<(String, Vec<Position>)> for ReviewCache {
    fn from_iter<T: IntoIterator<Item = (String, Vec<Position>)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// 리뷰 코멘트 생성 방식.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewMode {
    /// 새로 추가된 라인마다 고정 제안 문구를 단다.
    Suggestion,
    /// LLM 리뷰어의 결과를 diff 위치에 매핑한다.
    Ai,
}

impl ReviewMode {
    /// 설정 문자열을 모드로 변환한다.
    /// 지원값: suggestion/ai(llm) (미지정/알수없음은 suggestion)
    pub fn from_config(value: Option<&str>) -> Self {
        let Some(raw) = value else {
            return Self::Suggestion;
        };

        match raw.trim().to_ascii_lowercase().as_str() {
            "ai" | "llm" => Self::Ai,
            _ => Self::Suggestion,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Suggestion => "suggestion",
            Self::Ai => "ai",
        }
    }
}

/// 한 번의 실행에서 게시할 리뷰 초안.
#[derive(Debug, Clone, Default)]
pub struct ReviewDraft {
    pub comments: Vec<InlineComment>,
    /// 특정 라인에 붙일 수 없는 일반 의견.
    pub notes: Vec<String>,
    pub new_cache: ReviewCache,
}

impl ReviewDraft {
    pub fn has_content(&self) -> bool {
        !self.comments.is_empty() || !self.notes.is_empty()
    }
}

/// 리뷰 실행 결과.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewOutcome {
    /// 봇이 리뷰어로 요청되지 않음.
    Skipped,
    /// 리뷰할 새 라인이 없음.
    NothingToReview,
    /// dry-run: 게시 없이 출력만 함.
    DryRun { comments: usize },
    Posted { comments: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removed_or_empty_files_are_not_reviewable() {
        let removed = FilePatch::new("a.rs", Some("+x".into()), FileStatus::Removed);
        let empty = FilePatch::new("b.rs", Some(String::new()), FileStatus::Modified);
        let missing = FilePatch::new("c.rs", None, FileStatus::Renamed);
        let live = FilePatch::new("d.rs", Some("+x".into()), FileStatus::Added);

        assert!(!removed.is_reviewable());
        assert!(!empty.is_reviewable());
        assert!(!missing.is_reviewable());
        assert!(live.is_reviewable());
    }

    #[test]
    fn unknown_status_maps_to_other() {
        assert_eq!(FileStatus::parse("REMOVED"), FileStatus::Removed);
        assert_eq!(FileStatus::parse("something-new"), FileStatus::Other);
    }

    #[test]
    fn review_mode_defaults_to_suggestion() {
        assert_eq!(ReviewMode::from_config(None), ReviewMode::Suggestion);
        assert_eq!(ReviewMode::from_config(Some(" AI ")), ReviewMode::Ai);
        assert_eq!(ReviewMode::from_config(Some("nope")), ReviewMode::Suggestion);
    }

    #[test]
    fn cache_serializes_as_plain_map() {
        let cache: ReviewCache = [("f.py".to_string(), vec![3, 4])].into_iter().collect();
        let json = serde_json::to_string(&cache).unwrap();
        assert_eq!(json, r#"{"f.py":[3,4]}"#);
    }

    #[test]
    fn added_since_ignores_collapsed_duplicates() {
        let older: ReviewCache = [("f.py".to_string(), vec![3, 3])].into_iter().collect();
        let newer: ReviewCache = [("f.py".to_string(), vec![3, 4])].into_iter().collect();
        assert_eq!(newer.total_positions(), older.total_positions());
        assert_eq!(newer.added_since(&older), 1);

        let deduped: ReviewCache = [("f.py".to_string(), vec![3])].into_iter().collect();
        assert_eq!(deduped.added_since(&older), 0);
    }
}
