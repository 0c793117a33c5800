//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::review_pr::ReviewPrUseCase;
use crate::infrastructure::adapters::{
    AssistantFactoryAdapter, ConsoleReporter, HostFactoryAdapter, HostTokenResolverAdapter,
    JsonConfigRepository, MarkdownRendererAdapter, RunOptionsTargetResolver,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    host_token_resolver: HostTokenResolverAdapter,
    target_resolver: RunOptionsTargetResolver,
    host_factory: HostFactoryAdapter,
    assistant_factory: AssistantFactoryAdapter,
    renderer: MarkdownRendererAdapter,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            host_token_resolver: HostTokenResolverAdapter,
            target_resolver: RunOptionsTargetResolver,
            host_factory: HostFactoryAdapter,
            assistant_factory: AssistantFactoryAdapter,
            renderer: MarkdownRendererAdapter,
            reporter: ConsoleReporter::new(),
        }
    }
}

impl AppComposition {
    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// 리뷰 실행 유스케이스를 생성한다.
    pub fn review_usecase(&self) -> ReviewPrUseCase<'_> {
        ReviewPrUseCase {
            config_repo: &self.config_repo,
            host_token_resolver: &self.host_token_resolver,
            target_resolver: &self.target_resolver,
            host_factory: &self.host_factory,
            assistant_factory: &self.assistant_factory,
            renderer: &self.renderer,
            reporter: &self.reporter,
        }
    }
}
