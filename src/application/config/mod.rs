//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::policy::DEFAULT_SUGGESTION_BODY;
use crate::domain::review::ReviewMode;
use crate::domain::target::DEFAULT_HOST;

pub const DEFAULT_BOT_LOGIN: &str = "dhp-pr-review-bot";
pub const DEFAULT_REVIEW_BODY: &str = "🤖 dhp-pr-review-bot reviewed this PR.";
pub const DEFAULT_MAX_PATCH_BYTES: usize = 60_000;
pub const DEFAULT_KB_TOP_K: u32 = 5;
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert code reviewer and security analyst. \
Provide constructive feedback, identify potential issues, suggest improvements, and point out security vulnerabilities.";

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// 호스트별 인증/엔드포인트 설정
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
    /// ai 모드 LLM 리뷰어 설정
    #[serde(default)]
    pub reviewer: ReviewerConfig,
    /// ai 모드 지식 베이스 설정
    #[serde(default)]
    pub knowledge_base: KnowledgeBaseConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 리뷰 요청 여부를 확인할 봇 계정 login
    pub bot_login: Option<String>,
    /// 리뷰 모드(suggestion/ai)
    pub mode: Option<String>,
    /// 일괄 리뷰 본문
    pub review_body: Option<String>,
    /// suggestion 모드 inline 코멘트 문구
    pub suggestion_body: Option<String>,
    /// 봇이 리뷰어로 요청됐을 때만 실행할지 여부(기본 true)
    pub require_review_request: Option<bool>,
    /// 리뷰어에게 보낼 파일별 patch 최대 바이트
    pub max_patch_bytes: Option<usize>,
    /// 리뷰어 시스템 프롬프트
    pub system_prompt: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// API base URL override(선택)
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct ReviewerConfig {
    /// openai / anthropic / command
    pub backend: Option<String>,
    /// API 모드 모델 식별자
    pub model: Option<String>,
    /// API 모드 베이스 URL
    pub api_base: Option<String>,
    /// API 인증 키(직접값)
    pub api_key: Option<String>,
    /// API 인증 키를 읽을 환경변수 이름
    pub api_key_env: Option<String>,
    /// command 모드 실행 명령
    pub command: Option<String>,
    /// command 모드 인자(`{prompt}` 치환 지원)
    pub args: Option<Vec<String>>,
    /// 프롬프트를 stdin으로 전달할지 여부(기본 true)
    pub use_stdin: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct KnowledgeBaseConfig {
    /// 지식 베이스 사용 여부(기본 false)
    pub enabled: Option<bool>,
    /// 검색 엔드포인트 URL
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub api_key_env: Option<String>,
    /// 검색 결과 개수
    pub top_k: Option<u32>,
}

/// 설정에서 선택된 리뷰어 백엔드.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerBackend {
    OpenAi,
    Anthropic,
    Command,
}

impl ReviewerBackend {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "openai" => Some(Self::OpenAi),
            "anthropic" | "claude" => Some(Self::Anthropic),
            "command" | "cli" => Some(Self::Command),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Command => "command",
        }
    }

    /// `api_key_env` 미지정 시 읽을 환경변수 이름.
    pub fn default_api_key_env(self) -> Option<&'static str> {
        match self {
            Self::OpenAi => Some("OPENAI_API_KEY"),
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::Command => None,
        }
    }
}

impl Config {
    pub fn bot_login(&self) -> String {
        non_blank(self.defaults.bot_login.as_deref()).unwrap_or(DEFAULT_BOT_LOGIN).to_string()
    }

    pub fn mode(&self) -> ReviewMode {
        ReviewMode::from_config(self.defaults.mode.as_deref())
    }

    pub fn review_body(&self) -> String {
        non_blank(self.defaults.review_body.as_deref())
            .unwrap_or(DEFAULT_REVIEW_BODY)
            .to_string()
    }

    pub fn suggestion_body(&self) -> String {
        non_blank(self.defaults.suggestion_body.as_deref())
            .unwrap_or(DEFAULT_SUGGESTION_BODY)
            .to_string()
    }

    pub fn require_review_request(&self) -> bool {
        self.defaults.require_review_request.unwrap_or(true)
    }

    pub fn max_patch_bytes(&self) -> usize {
        self.defaults
            .max_patch_bytes
            .unwrap_or(DEFAULT_MAX_PATCH_BYTES)
    }

    pub fn system_prompt(&self) -> String {
        non_blank(self.defaults.system_prompt.as_deref())
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
            .to_string()
    }

    /// 호스트 설정을 찾고, github.com은 설정이 없어도 `GITHUB_TOKEN`을 기본으로 쓴다.
    pub fn host_config(&self, host: &str) -> Option<HostConfig> {
        if let Some(cfg) = self.hosts.get(host) {
            return Some(cfg.clone());
        }
        (host == DEFAULT_HOST).then(|| HostConfig {
            token: None,
            token_env: Some("GITHUB_TOKEN".to_string()),
            api_base: None,
        })
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);

        for (host, incoming) in other.hosts {
            if let Some(existing) = self.hosts.get_mut(&host) {
                existing.merge_from(incoming);
            } else {
                self.hosts.insert(host, incoming);
            }
        }

        self.reviewer.merge_from(other.reviewer);
        self.knowledge_base.merge_from(other.knowledge_base);
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        merge_opt(&mut self.bot_login, other.bot_login);
        merge_opt(&mut self.mode, other.mode);
        merge_opt(&mut self.review_body, other.review_body);
        merge_opt(&mut self.suggestion_body, other.suggestion_body);
        merge_opt(&mut self.require_review_request, other.require_review_request);
        merge_opt(&mut self.max_patch_bytes, other.max_patch_bytes);
        merge_opt(&mut self.system_prompt, other.system_prompt);
    }
}

impl HostConfig {
    pub fn merge_from(&mut self, other: HostConfig) {
        merge_opt(&mut self.token, other.token);
        merge_opt(&mut self.token_env, other.token_env);
        merge_opt(&mut self.api_base, other.api_base);
    }
}

impl ReviewerConfig {
    /// 백엔드 선택값을 해석한다. 미지정이면 None, 알 수 없는 값은 Err 메시지.
    pub fn backend(&self) -> Result<Option<ReviewerBackend>, String> {
        let Some(raw) = non_blank(self.backend.as_deref()) else {
            return Ok(None);
        };
        ReviewerBackend::parse(raw)
            .map(Some)
            .ok_or_else(|| format!("unknown reviewer backend '{raw}' (expected openai, anthropic, or command)"))
    }

    pub fn use_stdin(&self) -> bool {
        self.use_stdin.unwrap_or(true)
    }

    pub fn merge_from(&mut self, other: ReviewerConfig) {
        merge_opt(&mut self.backend, other.backend);
        merge_opt(&mut self.model, other.model);
        merge_opt(&mut self.api_base, other.api_base);
        merge_opt(&mut self.api_key, other.api_key);
        merge_opt(&mut self.api_key_env, other.api_key_env);
        merge_opt(&mut self.command, other.command);
        merge_opt(&mut self.args, other.args);
        merge_opt(&mut self.use_stdin, other.use_stdin);
    }
}

impl KnowledgeBaseConfig {
    pub fn is_enabled(&self) -> bool {
        self.enabled.unwrap_or(false)
    }

    pub fn top_k(&self) -> u32 {
        self.top_k.unwrap_or(DEFAULT_KB_TOP_K)
    }

    pub fn merge_from(&mut self, other: KnowledgeBaseConfig) {
        merge_opt(&mut self.enabled, other.enabled);
        merge_opt(&mut self.endpoint, other.endpoint);
        merge_opt(&mut self.api_key, other.api_key);
        merge_opt(&mut self.api_key_env, other.api_key_env);
        merge_opt(&mut self.top_k, other.top_k);
    }
}

fn merge_opt<T>(target: &mut Option<T>, incoming: Option<T>) {
    if incoming.is_some() {
        *target = incoming;
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
