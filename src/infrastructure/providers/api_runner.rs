//! HTTP API 호출 공용 유틸리티(리뷰어/지식 베이스 공통).

use std::time::Duration;

use anyhow::{Context, Result, bail};
use reqwest::{Client, RequestBuilder};
use serde_json::Value;

/// API 호출용 기본 HTTP 클라이언트를 생성한다.
pub fn build_api_client() -> Client {
    // TLS 설정 실패 등 예외 상황에서는 기본 클라이언트로 폴백한다.
    Client::builder()
        .timeout(Duration::from_secs(120))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// JSON 응답을 기대하는 요청을 전송하고 실패/파싱 오류를 표준화한다.
pub async fn send_json(service: &str, action: &str, request: RequestBuilder) -> Result<Value> {
    let response = request
        .send()
        .await
        .with_context(|| format!("{service}: failed to {action}"))?;

    let status = response.status();
    let body = response
        .text()
        .await
        .with_context(|| format!("{service}: failed to read {action} response body"))?;

    if !status.is_success() {
        bail!("{service}: {action} failed ({status}): {body}");
    }

    serde_json::from_str(&body)
        .with_context(|| format!("{service}: invalid JSON response while trying to {action}"))
}

/// 응답 구조에서 텍스트를 재귀적으로 모은다. 배열 원소는 빈 줄로 구분한다.
pub fn collect_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.to_string(),
        Value::Array(items) => items
            .iter()
            .map(collect_text)
            .filter(|text| !text.trim().is_empty())
            .collect::<Vec<_>>()
            .join("\n\n"),
        Value::Object(map) => {
            for key in ["text", "content", "message", "context", "results", "chunks"] {
                if let Some(inner) = map.get(key) {
                    let text = collect_text(inner);
                    if !text.trim().is_empty() {
                        return text;
                    }
                }
            }
            String::new()
        }
        _ => String::new(),
    }
}
