//! 리뷰어 CLI 실행기.

use std::process::Stdio;

use anyhow::{Context, Result, bail};
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

/// 로컬 리뷰어 명령 실행 사양.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: String,
    pub args: Vec<String>,
    pub use_stdin: bool,
}

/// 리뷰어 명령을 실행하고, stdin 비터미널 오류면 인자 전달 방식으로 한 번 재시도한다.
pub async fn run_provider_command(
    provider_name: &str,
    spec: &CommandSpec,
    prompt: &str,
) -> Result<String> {
    let mut current = spec.clone();
    let mut tried_stdin_fallback = false;

    loop {
        match run_provider_command_once(provider_name, &current, prompt).await {
            Ok(text) => return Ok(text),
            Err(err) => {
                let lower = format!("{err:#}").to_lowercase();

                // Some CLIs reject piped stdin and require argument-based input.
                if current.use_stdin
                    && !tried_stdin_fallback
                    && lower.contains("stdin is not a terminal")
                {
                    tried_stdin_fallback = true;
                    current.use_stdin = false;
                    tracing::debug!(provider = provider_name, "retrying with prompt as argument");
                    continue;
                }

                return Err(err);
            }
        }
    }
}

/// `{prompt}` 치환 또는 stdin 전달 규칙에 따라 최종 실행 인자를 구성한다.
fn build_args(spec: &CommandSpec, prompt: &str) -> Vec<String> {
    let mut args = Vec::with_capacity(spec.args.len() + 1);
    let mut prompt_in_args = false;
    for arg in &spec.args {
        if arg.contains("{prompt}") {
            prompt_in_args = true;
            args.push(arg.replace("{prompt}", prompt));
        } else {
            args.push(arg.clone());
        }
    }

    if !spec.use_stdin && !prompt_in_args {
        args.push(prompt.to_string());
    }
    args
}

async fn run_provider_command_once(
    provider_name: &str,
    spec: &CommandSpec,
    prompt: &str,
) -> Result<String> {
    let args = build_args(spec, prompt);

    let mut cmd = Command::new(&spec.command);
    cmd.args(&args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    if spec.use_stdin {
        cmd.stdin(Stdio::piped());
    } else {
        cmd.stdin(Stdio::null());
    }

    let mut child = cmd
        .spawn()
        .with_context(|| format!("failed to spawn {} command '{}'", provider_name, spec.command))?;

    if spec.use_stdin {
        let mut stdin = child
            .stdin
            .take()
            .context("failed to open reviewer command stdin")?;
        stdin
            .write_all(prompt.as_bytes())
            .await
            .context("failed to write prompt to reviewer command stdin")?;
        drop(stdin);
    }

    let output = child
        .wait_with_output()
        .await
        .context("reviewer command execution failed")?;

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

    if !output.status.success() {
        bail!(
            "{} command failed ({}): {}",
            provider_name,
            output.status,
            if stderr.is_empty() {
                "no stderr output"
            } else {
                stderr.as_str()
            }
        );
    }

    if stdout.is_empty() {
        if stderr.is_empty() {
            bail!("{} command returned empty output", provider_name);
        }
        return Ok(stderr);
    }

    Ok(stdout)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(args: &[&str], use_stdin: bool) -> CommandSpec {
        CommandSpec {
            command: "reviewer".into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            use_stdin,
        }
    }

    #[test]
    fn placeholder_is_substituted_in_place() {
        let args = build_args(&spec(&["-p", "--input={prompt}"], false), "diff");
        assert_eq!(args, vec!["-p".to_string(), "--input=diff".to_string()]);
    }

    #[test]
    fn prompt_is_appended_without_stdin_or_placeholder() {
        let args = build_args(&spec(&["-p"], false), "diff");
        assert_eq!(args, vec!["-p".to_string(), "diff".to_string()]);
    }

    #[test]
    fn stdin_mode_leaves_args_untouched() {
        let args = build_args(&spec(&["-p"], true), "diff");
        assert_eq!(args, vec!["-p".to_string()]);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn stdin_prompt_is_echoed_back() {
        let spec = CommandSpec {
            command: "cat".into(),
            args: Vec::new(),
            use_stdin: true,
        };
        let out = run_provider_command("cat", &spec, "hello reviewer").await.unwrap();
        assert_eq!(out, "hello reviewer");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn non_zero_exit_is_an_error() {
        let spec = CommandSpec {
            command: "sh".into(),
            args: vec!["-c".into(), "echo boom >&2; exit 3".into()],
            use_stdin: false,
        };
        let err = run_provider_command("sh", &spec, "ignored").await.unwrap_err();
        assert!(format!("{err:#}").contains("boom"));
    }
}
