//! 마크다운 렌더링 포트 구현 어댑터.

use crate::application::ports::MarkdownRenderer;
use crate::infrastructure::render;

/// 마크다운 렌더링 어댑터.
pub struct MarkdownRendererAdapter;

impl MarkdownRenderer for MarkdownRendererAdapter {
    fn render_review(&self, base_body: &str, notes: &[String], comment_count: usize) -> String {
        render::render_review_markdown(base_body, notes, comment_count)
    }
}
