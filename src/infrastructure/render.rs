//! 리뷰 본문 Markdown 렌더링 모듈.

/// 일괄 리뷰 본문을 생성한다. 위치에 묶이지 않은 노트는 별도 섹션으로 붙인다.
pub fn render_review_markdown(base_body: &str, notes: &[String], comment_count: usize) -> String {
    let mut out = String::new();
    out.push_str(base_body.trim());
    out.push('\n');

    if comment_count > 0 {
        out.push_str(&format!(
            "\n{} inline comment(s) on newly added lines.\n",
            comment_count
        ));
    }

    let notes: Vec<&str> = notes
        .iter()
        .map(|n| n.trim())
        .filter(|n| !n.is_empty())
        .collect();
    if !notes.is_empty() {
        out.push_str("\n## Review Notes\n\n");
        for note in notes {
            out.push_str(&format_note(note));
        }
    }

    out
}

/// 한 줄 노트는 목록 항목으로, 여러 줄 노트는 구분선으로 감싼 블록으로 출력한다.
fn format_note(note: &str) -> String {
    if note.contains('\n') {
        format!("---\n\n{note}\n\n")
    } else {
        format!("- {note}\n")
    }
}
