//! Command Runner
//!
//! Executes the `zpool`/`zfs` listing commands as direct argument vectors
//! (program plus arguments, no shell) and hands back their standard output.
//!
//! # Failure model
//!
//! [`CommandRunner::run`] reports every failure as an [`ExporterError`]. The
//! collectors go through [`run_or_empty`], which turns failures of the command
//! itself (spawn error, non-zero exit, timeout) into an empty result after
//! logging them, so a broken `zpool` never hides the `zfs` metrics and vice versa.

use crate::config::ZfsConfig;
use crate::error::{ExporterError, Result};
use std::future::Future;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, error};

/// Something that can run a command line and return its standard output
///
/// Implemented by [`SystemCommandRunner`] for real hosts; tests substitute
/// canned output.
pub trait CommandRunner: Send + Sync {
    /// Run `argv[0]` with `argv[1..]` as arguments
    ///
    /// Returns standard output decoded as UTF-8, unmodified.
    fn run(&self, argv: &[String]) -> impl Future<Output = Result<String>> + Send;
}

/// Runs commands as child processes of the exporter
#[derive(Debug, Clone, Default)]
pub struct SystemCommandRunner {
    timeout: Option<Duration>,
}

impl SystemCommandRunner {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self { timeout }
    }

    pub fn from_config(config: &ZfsConfig) -> Self {
        let timeout = match config.command_timeout_seconds {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self::new(timeout)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, argv: &[String]) -> Result<String> {
        let (program, args) = argv.split_first().ok_or(ExporterError::EmptyCommand)?;
        let command_line = argv.join(" ");
        debug!("Running '{}'", command_line);

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ExporterError::Spawn {
                command: command_line.clone(),
                source,
            })?;

        // Dropping the wait future on timeout drops the child, which kills it
        let output = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, child.wait_with_output())
                .await
                .map_err(|_| ExporterError::Timeout {
                    command: command_line.clone(),
                    seconds: limit.as_secs(),
                })??,
            None => child.wait_with_output().await?,
        };

        if !output.status.success() {
            return Err(ExporterError::CommandFailed {
                command: command_line,
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim_end().to_string(),
            });
        }

        String::from_utf8(output.stdout).map_err(|_| ExporterError::InvalidUtf8 {
            command: command_line,
        })
    }
}

/// Run a command, degrading command failures to empty output
///
/// Spawn errors, non-zero exits and timeouts are logged at error level and
/// yield `""`, which parses to zero records. Anything else (an empty command
/// line, undecodable output) is returned to the caller.
pub async fn run_or_empty<R: CommandRunner>(runner: &R, argv: &[String]) -> Result<String> {
    match runner.run(argv).await {
        Ok(stdout) => Ok(stdout),
        Err(e) if e.is_command_failure() => {
            error!("{}", e);
            Ok(String::new())
        }
        Err(e) => Err(e),
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_returns_stdout_unmodified() {
        let runner = SystemCommandRunner::default();
        let out = runner
            .run(&argv(&["printf", "tank\\t1\\n\\n"]))
            .await
            .expect("printf should succeed");
        assert_eq!(out, "tank\t1\n\n");
    }

    #[tokio::test]
    async fn test_arguments_are_not_shell_parsed() {
        let runner = SystemCommandRunner::default();
        let out = runner
            .run(&argv(&["printf", "%s", "$HOME; echo injected"]))
            .await
            .unwrap();
        assert_eq!(out, "$HOME; echo injected");
    }

    #[tokio::test]
    async fn test_nonzero_exit_carries_stderr() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run(&argv(&["sh", "-c", "echo 'no pools available' >&2; exit 1"]))
            .await
            .unwrap_err();

        match &err {
            ExporterError::CommandFailed { stderr, .. } => {
                assert_eq!(stderr, "no pools available")
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_command_failure());
    }

    #[tokio::test]
    async fn test_missing_program_is_spawn_error() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run(&argv(&["definitely-not-a-zfs-binary", "list"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExporterError::Spawn { .. }));
    }

    #[tokio::test]
    async fn test_empty_command_line() {
        let runner = SystemCommandRunner::default();
        let err = runner.run(&[]).await.unwrap_err();
        assert!(matches!(err, ExporterError::EmptyCommand));
        assert!(!err.is_command_failure());
    }

    #[tokio::test]
    async fn test_timeout_kills_hung_command() {
        let runner = SystemCommandRunner::new(Some(Duration::from_millis(100)));
        let err = runner.run(&argv(&["sleep", "5"])).await.unwrap_err();
        assert!(matches!(err, ExporterError::Timeout { .. }));
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_reported() {
        let runner = SystemCommandRunner::default();
        let err = runner
            .run(&argv(&["printf", "\\377\\376"]))
            .await
            .unwrap_err();
        assert!(matches!(err, ExporterError::InvalidUtf8 { .. }));
    }

    #[tokio::test]
    async fn test_run_or_empty_degrades_command_failures() {
        let runner = SystemCommandRunner::default();
        let out = run_or_empty(&runner, &argv(&["sh", "-c", "exit 3"]))
            .await
            .expect("command failure should degrade");
        assert_eq!(out, "");
    }

    #[tokio::test]
    async fn test_run_or_empty_propagates_empty_command() {
        let runner = SystemCommandRunner::default();
        assert!(run_or_empty(&runner, &[]).await.is_err());
    }

    #[test]
    fn test_zero_timeout_disables_limit() {
        let config = ZfsConfig {
            command_timeout_seconds: 0,
            ..ZfsConfig::default()
        };
        assert!(SystemCommandRunner::from_config(&config).timeout().is_none());
        assert_eq!(
            SystemCommandRunner::from_config(&ZfsConfig::default()).timeout(),
            Some(Duration::from_secs(30))
        );
    }
}
