//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::domain::review::{ReviewMode, RunOptions};

#[derive(Debug, Parser)]
#[command(name = "pr-review-bot")]
#[command(about = "Incremental pull request review bot that comments only on newly added lines")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Pull request URL (https://github.com/OWNER/NAME/pull/N)
    #[arg(env = "PR_URL")]
    url: Option<String>,

    /// Repository as OWNER/NAME (used when no URL is given)
    #[arg(long, env = "REPO")]
    repo: Option<String>,

    /// Pull request number (used with --repo)
    #[arg(long = "pr", env = "PR_NUMBER")]
    pr_number: Option<String>,

    /// Bot account login that must be requested as reviewer
    #[arg(long, env = "BOT_USER")]
    bot_login: Option<String>,

    /// Comment mode
    #[arg(long, env = "PR_REVIEW_BOT_MODE", value_parser = ["suggestion", "ai"])]
    mode: Option<String>,

    /// Print the review and cache comment to stdout, do not post
    #[arg(long)]
    dry_run: bool,

    /// Review even if the bot was not requested as reviewer
    #[arg(long)]
    force: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show effective merged config and credential sources
    Config,
}

#[derive(Debug)]
pub enum CliAction {
    InspectConfig,
    Review(RunOptions),
}

impl Cli {
    pub fn parse_action() -> CliAction {
        Cli::parse().into_action()
    }

    fn into_action(self) -> CliAction {
        match self.command {
            Some(Commands::Config) => CliAction::InspectConfig,
            None => CliAction::Review(RunOptions {
                url: self.url,
                repo: self.repo,
                pr_number: self.pr_number,
                bot_login: self.bot_login,
                mode: self
                    .mode
                    .as_deref()
                    .map(|m| ReviewMode::from_config(Some(m))),
                dry_run: self.dry_run,
                force: self.force,
            }),
        }
    }
}
