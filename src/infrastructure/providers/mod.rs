//! LLM 리뷰어 백엔드 공통 모듈.
//! 설정에서 선택된 백엔드(OpenAI 호환 API / Anthropic API / 로컬 명령)를 구성한다.

pub mod anthropic;
pub mod command;
pub mod openai;
mod api_runner;
mod command_runner;

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::application::config::{Config, ReviewerBackend};

pub use api_runner::{build_api_client, collect_text, send_json};

#[async_trait]
pub trait ReviewProvider: Send + Sync {
    /// 사용자 표시 이름
    fn name(&self) -> &'static str;
    /// 프롬프트 하나를 보내고 응답 텍스트를 받는다
    async fn review(&self, prompt: &str) -> Result<String>;
}

/// 설정의 `reviewer.backend`에 맞는 리뷰어를 생성한다.
pub fn build_reviewer(config: &Config) -> Result<Box<dyn ReviewProvider>> {
    let backend = match config.reviewer.backend() {
        Ok(Some(backend)) => backend,
        Ok(None) => bail!(
            "reviewer.backend is not configured. Set it to openai, anthropic, or command for ai mode"
        ),
        Err(msg) => bail!("{msg}"),
    };

    tracing::debug!(backend = backend.code(), "building reviewer");

    match backend {
        ReviewerBackend::OpenAi => Ok(Box::new(openai::OpenAiProvider::from_config(
            &config.reviewer,
        )?)),
        ReviewerBackend::Anthropic => Ok(Box::new(anthropic::AnthropicProvider::from_config(
            &config.reviewer,
        )?)),
        ReviewerBackend::Command => Ok(Box::new(command::CommandProvider::from_config(
            &config.reviewer,
        )?)),
    }
}
