//! `pr-review-bot` 바이너리 진입점.

use pr_review_bot::domain::review::ReviewOutcome;
use pr_review_bot::interface::cli::{AppComposition, Cli, CliAction};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // clap은 사용법 오류 시 직접 exit code 2로 종료한다.
    let action = Cli::parse_action();
    let composition = AppComposition::default();

    match action {
        CliAction::InspectConfig => match composition.inspect_config_usecase().execute() {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err:#}");
                std::process::exit(1);
            }
        },
        CliAction::Review(options) => {
            match composition.review_usecase().execute(options).await {
                Ok(outcome) => report_outcome(&outcome),
                Err(err) => {
                    eprintln!("error: {err:#}");
                    std::process::exit(1);
                }
            }
        }
    }
}

fn report_outcome(outcome: &ReviewOutcome) {
    match outcome {
        ReviewOutcome::Skipped => tracing::info!("bot was not requested as reviewer"),
        ReviewOutcome::NothingToReview => tracing::info!("no new lines to review"),
        ReviewOutcome::DryRun { comments } => {
            tracing::info!(comments, "dry run finished")
        }
        ReviewOutcome::Posted { comments } => tracing::info!(comments, "review finished"),
    }
}
