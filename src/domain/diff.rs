//! unified diff patch를 diff 위치 단위로 해석한다.

use crate::domain::review::Position;

/// patch 라인 분류.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    HunkHeader,
    Added,
    Removed,
    Context,
}

impl LineKind {
    /// `+`로 시작하되 `++`(파일 헤더 `+++`)는 아닌 라인만 추가 라인이다.
    pub fn classify(line: &str) -> Self {
        if line.starts_with("@@") {
            Self::HunkHeader
        } else if line.starts_with('+') && !line.starts_with("++") {
            Self::Added
        } else if line.starts_with('-') && !line.starts_with("--") {
            Self::Removed
        } else {
            Self::Context
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffLine<'a> {
    /// patch 본문 전체(헤더 포함) 기준 1-based 위치.
    pub position: Position,
    pub kind: LineKind,
    /// 새 revision 파일의 라인 번호(새 쪽에 존재하는 라인만).
    pub new_line: Option<u32>,
    pub text: &'a str,
}

/// patch를 `\n` 기준으로 나눠 위치/분류/새 파일 라인 번호를 계산한다.
pub fn parse_patch(patch: &str) -> Vec<DiffLine<'_>> {
    let mut out = Vec::new();
    let mut next_new: Option<u32> = None;

    for (idx, text) in patch.split('\n').enumerate() {
        let position = idx as Position + 1;
        let kind = LineKind::classify(text);

        let new_line = match kind {
            LineKind::HunkHeader => {
                next_new = parse_new_start(text);
                None
            }
            _ => consume_new_line(text, &mut next_new),
        };

        out.push(DiffLine {
            position,
            kind,
            new_line,
            text,
        });
    }

    out
}

/// 추가 라인 위치만 순서대로 반환한다.
pub fn added_positions(patch: &str) -> Vec<Position> {
    patch
        .split('\n')
        .enumerate()
        .filter(|(_, line)| LineKind::classify(line) == LineKind::Added)
        .map(|(idx, _)| idx as Position + 1)
        .collect()
}

/// 새 파일 라인 번호를 해당 추가 라인의 diff 위치로 변환한다.
pub fn position_for_new_line(lines: &[DiffLine<'_>], new_line: u32) -> Option<Position> {
    lines
        .iter()
        .find(|l| l.kind == LineKind::Added && l.new_line == Some(new_line))
        .map(|l| l.position)
}

/// UTF-8 경계를 지키면서 patch를 최대 바이트로 자른다.
pub fn truncate_patch(patch: &str, max_bytes: usize) -> String {
    if patch.len() <= max_bytes {
        return patch.to_string();
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !patch.is_char_boundary(cutoff) {
        cutoff -= 1;
    }

    let mut out = patch[..cutoff].to_string();
    out.push_str("\n... (patch truncated)");
    out
}

/// `max_bytes` 안에 온전히 들어가는 라인들만 남긴 patch 앞부분.
pub fn reviewed_prefix(patch: &str, max_bytes: usize) -> &str {
    if patch.len() <= max_bytes {
        return patch;
    }

    let mut cutoff = max_bytes;
    while cutoff > 0 && !patch.is_char_boundary(cutoff) {
        cutoff -= 1;
    }
    // 잘린 마지막 라인은 제외한다.
    match patch[..cutoff].rfind('\n') {
        Some(end) => &patch[..end],
        None => "",
    }
}

fn consume_new_line(text: &str, next_new: &mut Option<u32>) -> Option<u32> {
    // hunk 밖(파일 헤더 등)에서는 새 파일 라인 번호가 없다.
    let current = (*next_new)?;
    match text.as_bytes().first() {
        Some(b'-') | Some(b'\\') => None,
        _ => {
            *next_new = Some(current + 1);
            Some(current)
        }
    }
}

fn parse_new_start(header: &str) -> Option<u32> {
    // @@ -a,b +c,d @@ optional section
    let rest = header.strip_prefix("@@")?;
    let plus = rest.find('+')?;
    let spec = rest[plus + 1..].split_whitespace().next()?;
    let start = spec.split(',').next()?;
    start.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const SAMPLE: &str = "@@ -1,2 +1,3 @@\n-foo\n+bar\n+baz\n context";

    #[test]
    fn positions_count_every_line() {
        let lines = parse_patch(SAMPLE);
        let kinds: Vec<(Position, LineKind)> = lines.iter().map(|l| (l.position, l.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, LineKind::HunkHeader),
                (2, LineKind::Removed),
                (3, LineKind::Added),
                (4, LineKind::Added),
                (5, LineKind::Context),
            ]
        );
        assert_eq!(added_positions(SAMPLE), vec![3, 4]);
    }

    #[test]
    fn new_line_numbers_follow_hunk_headers() {
        let patch = "@@ -10,3 +20,4 @@ fn main()\n ctx\n-old\n+new1\n+new2\n ctx2\n@@ -40 +51,2 @@\n+tail\n\\ No newline at end of file";
        let lines = parse_patch(patch);
        let numbered: Vec<(Position, Option<u32>)> =
            lines.iter().map(|l| (l.position, l.new_line)).collect();
        assert_eq!(
            numbered,
            vec![
                (1, None),
                (2, Some(20)),
                (3, None),
                (4, Some(21)),
                (5, Some(22)),
                (6, Some(23)),
                (7, None),
                (8, Some(51)),
                (9, None),
            ]
        );
        assert_eq!(position_for_new_line(&lines, 22), Some(5));
        assert_eq!(position_for_new_line(&lines, 51), Some(8));
    }

    #[test]
    fn context_lines_are_not_comment_targets() {
        let lines = parse_patch(SAMPLE);
        // new line 3 is the trailing context line
        assert_eq!(lines[4].new_line, Some(3));
        assert_eq!(position_for_new_line(&lines, 3), None);
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        assert_eq!(truncate_patch("+abc", 10), "+abc");
        // "é" is two bytes; cutting inside it backs off to the boundary
        assert_eq!(truncate_patch("+é", 2), "+\n... (patch truncated)");
    }

    #[test]
    fn reviewed_prefix_keeps_only_whole_lines() {
        assert_eq!(reviewed_prefix(SAMPLE, 100), SAMPLE);
        // cut lands inside "+baz"
        assert_eq!(reviewed_prefix(SAMPLE, 27), "@@ -1,2 +1,3 @@\n-foo\n+bar");
        assert_eq!(added_positions(reviewed_prefix(SAMPLE, 27)), vec![3]);
        assert_eq!(reviewed_prefix(SAMPLE, 5), "");
    }

    #[test]
    fn file_header_lines_are_not_added() {
        assert_eq!(LineKind::classify("+++ b/src/lib.rs"), LineKind::Context);
        assert_eq!(LineKind::classify("--- a/src/lib.rs"), LineKind::Context);
        assert_eq!(added_positions("+++ b/x\n@@ -0,0 +1 @@\n+a"), vec![3]);
    }
}
