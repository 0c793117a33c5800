//! LLM 리뷰어의 구조화된 출력(JSON) 해석.

use std::collections::BTreeMap;

use anyhow::{Context, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewFindings {
    pub pr_summary: Option<String>,
    pub improvement_suggestions: Vec<String>,
    pub code_issues: Vec<CodeIssue>,
    pub security_vulnerabilities: Vec<SecurityIssue>,
    pub overall_review_comments: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CodeIssue {
    pub file: Option<String>,
    pub line_number: Option<u32>,
    pub comment: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecurityIssue {
    pub file: Option<String>,
    pub line_number: Option<u32>,
    pub comment: String,
    pub severity: Option<String>,
    pub category: Option<String>,
}

/// 라인 번호가 붙은 단일 지적 사항(코드/보안 공통).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineFinding {
    pub line_number: Option<u32>,
    pub body: String,
}

impl ReviewFindings {
    /// 코드/보안 이슈를 코멘트 본문 형태로 평탄화한다.
    pub fn line_findings(&self) -> Vec<LineFinding> {
        let code = self.code_issues.iter().map(|issue| LineFinding {
            line_number: issue.line_number,
            body: label_body(&[issue.category.as_deref()], &issue.comment),
        });
        let security = self.security_vulnerabilities.iter().map(|issue| LineFinding {
            line_number: issue.line_number,
            body: label_body(
                &[Some("Security"), issue.severity.as_deref(), issue.category.as_deref()],
                &issue.comment,
            ),
        });

        code.chain(security)
            .filter(|f| !f.body.trim().is_empty())
            .collect()
    }

    /// 라인에 묶이지 않는 요약/제안 문구.
    pub fn general_notes(&self) -> Vec<String> {
        let mut notes = Vec::new();
        if let Some(summary) = self.pr_summary.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            notes.push(summary.to_string());
        }
        for suggestion in &self.improvement_suggestions {
            let suggestion = suggestion.trim();
            if !suggestion.is_empty() {
                notes.push(format!("Suggestion: {suggestion}"));
            }
        }
        if let Some(overall) = self
            .overall_review_comments
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            notes.push(overall.to_string());
        }
        notes
    }
}

/// 응답 텍스트에서 ```json 펜스 본문(없으면 전체)을 꺼내 디코딩한다.
pub fn parse_findings(response: &str) -> Result<ReviewFindings> {
    let json = extract_json_block(response);
    serde_json::from_str(json).context("reviewer response is not valid findings JSON")
}

/// 첫 ```json 펜스부터 마지막 ``` 펜스 사이를 반환한다.
pub fn extract_json_block(text: &str) -> &str {
    const OPEN: &str = "```json";

    if let Some(start) = text.find(OPEN)
        && let Some(end) = text.rfind("```")
        && end > start
    {
        return text[start + OPEN.len()..end].trim();
    }
    text.trim()
}

/// 같은 라인에 여러 지적이 있으면 빈 줄로 이어 붙인다.
pub fn group_by_line(findings: Vec<LineFinding>) -> (BTreeMap<u32, String>, Vec<String>) {
    let mut by_line: BTreeMap<u32, String> = BTreeMap::new();
    let mut unbound = Vec::new();

    for finding in findings {
        match finding.line_number {
            Some(line) => {
                let slot = by_line.entry(line).or_default();
                if !slot.is_empty() {
                    slot.push_str("\n\n");
                }
                slot.push_str(&finding.body);
            }
            None => unbound.push(finding.body),
        }
    }

    (by_line, unbound)
}

fn label_body(labels: &[Option<&str>], comment: &str) -> String {
    let labels: Vec<&str> = labels
        .iter()
        .flatten()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if labels.is_empty() {
        comment.trim().to_string()
    } else {
        format!("**[{}]** {}", labels.join(" / "), comment.trim())
    }
}
