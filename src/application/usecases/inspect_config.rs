//! 병합된 설정과 자격 증명 출처를 점검하는 유스케이스.

use anyhow::{Result, bail};

use crate::application::ports::ConfigRepository;
use crate::domain::review::ReviewMode;

/// 현재 적용 중인 설정을 JSON으로 보여주고, ai 모드 설정 오류를 먼저 알린다.
pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 설정 점검 결과 문자열을 생성한다.
    pub fn execute(&self) -> Result<String> {
        let config = self.config_repo.load()?;
        if config.mode() == ReviewMode::Ai
            && let Err(msg) = config.reviewer.backend()
        {
            bail!("{msg}");
        }
        self.config_repo.inspect_pretty_json()
    }
}
