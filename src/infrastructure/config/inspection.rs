//! 적용 설정 진단(inspection) 뷰 모델.
//! 자격 증명은 출처 라벨과 해석 여부만 노출한다.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::{resolve_api_key, resolve_host_token};
use super::utils::command_exists;
use crate::application::config::{
    Config, DefaultsConfig, HostConfig, KnowledgeBaseConfig, ReviewerConfig,
};
use crate::domain::target::DEFAULT_HOST;

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub hosts: BTreeMap<String, HostInspection>,
    pub reviewer: ReviewerInspection,
    pub knowledge_base: KnowledgeBaseInspection,
}

#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub bot_login: String,
    pub mode: String,
    pub review_body: String,
    pub suggestion_body: String,
    pub require_review_request: bool,
    pub max_patch_bytes: usize,
    pub system_prompt: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInspection {
    pub token_source: Option<String>,
    pub token_resolved: bool,
    pub api_base: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReviewerInspection {
    pub backend: Option<String>,
    pub backend_error: Option<String>,
    pub model: Option<String>,
    pub api_base: Option<String>,
    pub api_key_source: Option<String>,
    pub api_key_resolved: bool,
    pub command: Option<String>,
    pub args: Vec<String>,
    pub use_stdin: bool,
    pub command_available: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct KnowledgeBaseInspection {
    pub enabled: bool,
    pub endpoint: Option<String>,
    pub top_k: u32,
    pub api_key_source: Option<String>,
    pub api_key_resolved: bool,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let config = &loaded.config;

        let mut hosts = BTreeMap::new();
        for (host, cfg) in &config.hosts {
            hosts.insert(host.clone(), host_inspection(cfg));
        }
        // github.com은 설정이 없어도 GITHUB_TOKEN 기본값으로 해석된다.
        if !hosts.contains_key(DEFAULT_HOST)
            && let Some(cfg) = config.host_config(DEFAULT_HOST)
        {
            hosts.insert(DEFAULT_HOST.to_string(), host_inspection(&cfg));
        }

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            defaults: config.defaults.clone(),
            effective_defaults: EffectiveDefaults::from_config(config),
            hosts,
            reviewer: ReviewerInspection::from_config(&config.reviewer),
            knowledge_base: KnowledgeBaseInspection::from_config(&config.knowledge_base),
        }
    }
}

impl EffectiveDefaults {
    fn from_config(config: &Config) -> Self {
        Self {
            bot_login: config.bot_login(),
            mode: config.mode().code().to_string(),
            review_body: config.review_body(),
            suggestion_body: config.suggestion_body(),
            require_review_request: config.require_review_request(),
            max_patch_bytes: config.max_patch_bytes(),
            system_prompt: config.system_prompt(),
        }
    }
}

impl ReviewerInspection {
    fn from_config(cfg: &ReviewerConfig) -> Self {
        let (backend, backend_error) = match cfg.backend() {
            Ok(backend) => (backend, None),
            Err(msg) => (None, Some(msg)),
        };
        let default_env = backend.and_then(|b| b.default_api_key_env());
        let api_key = resolve_api_key(
            cfg.api_key.as_deref(),
            cfg.api_key_env.as_deref().or(default_env),
        );
        let command = cfg
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string);
        let command_available = command.as_deref().map(command_exists).unwrap_or(false);

        Self {
            backend: backend.map(|b| b.code().to_string()),
            backend_error,
            model: cfg.model.clone(),
            api_base: cfg.api_base.clone(),
            api_key_source: api_key.source,
            api_key_resolved: api_key.credential.is_some(),
            command,
            args: cfg.args.clone().unwrap_or_default(),
            use_stdin: cfg.use_stdin(),
            command_available,
        }
    }
}

impl KnowledgeBaseInspection {
    fn from_config(cfg: &KnowledgeBaseConfig) -> Self {
        let api_key = resolve_api_key(cfg.api_key.as_deref(), cfg.api_key_env.as_deref());
        Self {
            enabled: cfg.is_enabled(),
            endpoint: cfg.endpoint.clone(),
            top_k: cfg.top_k(),
            api_key_source: api_key.source,
            api_key_resolved: api_key.credential.is_some(),
        }
    }
}

fn host_inspection(cfg: &HostConfig) -> HostInspection {
    let token_resolution = resolve_host_token(Some(cfg));
    HostInspection {
        token_source: token_resolution.source,
        token_resolved: token_resolution.token.is_some(),
        api_base: cfg.api_base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn secrets_never_appear_in_inspection_output() {
        let config: Config = serde_json::from_str(
            r#"{
                "hosts": {"github.com": {"token": "ghp_secret_value"}},
                "reviewer": {"backend": "openai", "api_key": "sk-secret-value"},
                "knowledge_base": {"enabled": true, "endpoint": "http://kb", "api_key": "kb-secret"}
            }"#,
        )
        .unwrap();
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("a.json")],
            loaded_paths: vec![PathBuf::from("a.json")],
        });

        // `defaults`만 원본 그대로 직렬화되고 hosts/reviewer/kb는 라벨만 남는다.
        let json = serde_json::to_string(&inspection).unwrap();
        assert!(!json.contains("ghp_secret_value"));
        assert!(!json.contains("sk-secret-value"));
        assert!(!json.contains("kb-secret"));

        assert_eq!(inspection.hosts["github.com"].token_source.as_deref(), Some("inline"));
        assert!(inspection.reviewer.api_key_resolved);
        assert_eq!(inspection.reviewer.backend.as_deref(), Some("openai"));
        assert!(inspection.knowledge_base.enabled);
    }

    #[test]
    fn unknown_backend_is_surfaced() {
        let config: Config =
            serde_json::from_str(r#"{"reviewer": {"backend": "bedrock"}}"#).unwrap();
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: Vec::new(),
            loaded_paths: Vec::new(),
        });
        assert!(inspection.reviewer.backend.is_none());
        assert!(inspection.reviewer.backend_error.is_some());
        assert_eq!(inspection.effective_defaults.mode, "suggestion");
    }
}
