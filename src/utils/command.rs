//! Command execution primitives with consistent error handling.

use std::process::{Command, Output};

use crate::error::{Error, Result};

/// Run a command and return trimmed stdout on success.
///
/// Returns an error with stderr (or stdout fallback) if it fails.
pub fn run(program: &str, args: &[&str], context: &str) -> Result<String> {
    finish(Command::new(program).args(args).output(), context)
}

fn finish(output: std::io::Result<Output>, context: &str) -> Result<String> {
    let output = output.map_err(|e| {
        Error::internal_io(
            format!("Failed to run {}: {}", context, e),
            Some(context.to_string()),
        )
    })?;

    if !output.status.success() {
        return Err(Error::internal_io(
            format!("{} failed: {}", context, error_text(&output)),
            Some(context.to_string()),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Extract error text from command output.
///
/// Prefers stderr, falls back to stdout if stderr is empty.
pub fn error_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr);
    if !stderr.trim().is_empty() {
        stderr.trim().to_string()
    } else {
        String::from_utf8_lossy(&output.stdout).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_returns_trimmed_stdout() {
        let out = run("git", &["--version"], "git version").unwrap();
        assert!(out.starts_with("git version"));
        assert_eq!(out, out.trim());
    }

    #[test]
    fn run_reports_missing_program() {
        let err = run("hotpot-definitely-missing-binary", &[], "missing").unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
        assert_eq!(err.details["context"], "missing");
    }

    #[test]
    fn run_surfaces_stderr_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_string_lossy().into_owned();
        let err = run("git", &["-C", &path, "rev-parse", "--git-dir"], "git rev-parse")
            .unwrap_err();
        let message = err.details["error"].as_str().unwrap_or_default().to_string();
        assert!(message.starts_with("git rev-parse failed:"));
    }
}
