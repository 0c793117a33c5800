//! 설정 모듈 공용 유틸리티.

use std::env;
use std::path::Path;

/// 리뷰어 명령이 실행 가능한 파일로 존재하는지 탐지한다.
/// 경로가 포함되면 해당 파일만, 아니면 PATH의 각 디렉터리를 검사한다.
pub fn command_exists(command: &str) -> bool {
    let command = command.trim();
    if command.is_empty() {
        return false;
    }

    let command_path = Path::new(command);
    if command_path.components().count() > 1 {
        return command_path.is_file();
    }

    let Some(path_var) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&path_var).any(|dir| {
        if dir.join(command).is_file() {
            return true;
        }
        // Windows는 확장자를 생략할 수 있다.
        cfg!(windows)
            && command_path.extension().is_none()
            && [".exe", ".cmd", ".bat"]
                .iter()
                .any(|ext| dir.join(format!("{command}{ext}")).is_file())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_and_unknown_commands_do_not_exist() {
        assert!(!command_exists("   "));
        assert!(!command_exists("pr-review-bot-no-such-command"));
    }

    #[test]
    fn explicit_paths_are_checked_directly() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("reviewer.sh");
        std::fs::write(&script, "#!/bin/sh\n").unwrap();

        assert!(command_exists(&script.display().to_string()));
        assert!(!command_exists(&dir.path().join("missing").display().to_string()));
    }
}
