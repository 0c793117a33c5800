//! 로컬 명령(예: `claude -p`, `llm`) 기반 리뷰어 어댑터.

use anyhow::{Result, bail};
use async_trait::async_trait;

use crate::application::config::ReviewerConfig;
use crate::infrastructure::config::command_exists;

use super::ReviewProvider;
use super::command_runner::{CommandSpec, run_provider_command};

pub struct CommandProvider {
    spec: CommandSpec,
}

impl CommandProvider {
    pub fn from_config(cfg: &ReviewerConfig) -> Result<Self> {
        let Some(command) = cfg
            .command
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        else {
            bail!("command reviewer: reviewer.command is not configured");
        };

        if !command_exists(command) {
            bail!("command reviewer: '{command}' not found in PATH");
        }

        Ok(Self {
            spec: CommandSpec {
                command: command.to_string(),
                args: cfg.args.clone().unwrap_or_default(),
                use_stdin: cfg.use_stdin(),
            },
        })
    }
}

#[async_trait]
impl ReviewProvider for CommandProvider {
    fn name(&self) -> &'static str {
        "Command"
    }

    async fn review(&self, prompt: &str) -> Result<String> {
        run_provider_command(self.name(), &self.spec, prompt).await
    }
}
