//! 설정 값(token/env 등)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수 접근은 인프라 계층에서만 수행한다.

use std::env;

use crate::application::config::HostConfig;
use crate::application::ports::HostTokenResolution;

/// API key 해석 결과. `source`는 진단용 라벨이며 비밀값을 담지 않는다.
#[derive(Debug, Clone, Default)]
pub struct CredentialResolution {
    pub credential: Option<String>,
    pub source: Option<String>,
}

/// Host 토큰을 해석한다. 직접값이 환경변수보다 우선한다.
pub fn resolve_host_token(host_cfg: Option<&HostConfig>) -> HostTokenResolution {
    let Some(cfg) = host_cfg else {
        return HostTokenResolution::default();
    };

    let resolved = resolve_api_key(cfg.token.as_deref(), cfg.token_env.as_deref());
    HostTokenResolution {
        token: resolved.credential,
        source: resolved.source,
    }
}

/// 직접값 → 환경변수 순으로 자격 증명을 해석한다.
pub fn resolve_api_key(inline: Option<&str>, env_name: Option<&str>) -> CredentialResolution {
    if let Some(key) = inline.map(str::trim).filter(|v| !v.is_empty()) {
        return CredentialResolution {
            credential: Some(key.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let Some(env_name) = env_name.map(str::trim).filter(|v| !v.is_empty()) else {
        return CredentialResolution::default();
    };

    match env::var(env_name).ok().map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => CredentialResolution {
            credential: Some(v),
            source: Some(format!("env:{env_name}")),
        },
        _ => CredentialResolution {
            credential: None,
            source: Some(format!("env:{env_name} (missing)")),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_token_wins() {
        let cfg = HostConfig {
            token: Some(" abc ".into()),
            token_env: Some("PR_REVIEW_BOT_TEST_UNSET_TOKEN".into()),
            api_base: None,
        };
        let resolved = resolve_host_token(Some(&cfg));
        assert_eq!(resolved.token.as_deref(), Some("abc"));
        assert_eq!(resolved.source.as_deref(), Some("inline"));
    }

    #[test]
    fn missing_env_is_labelled() {
        let resolved = resolve_api_key(None, Some("PR_REVIEW_BOT_TEST_UNSET_TOKEN"));
        assert!(resolved.credential.is_none());
        assert_eq!(
            resolved.source.as_deref(),
            Some("env:PR_REVIEW_BOT_TEST_UNSET_TOKEN (missing)")
        );
    }

    #[test]
    fn no_host_config_resolves_nothing() {
        let resolved = resolve_host_token(None);
        assert!(resolved.token.is_none());
        assert!(resolved.source.is_none());
    }
}
