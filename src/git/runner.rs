//! Execution of external programs (`git`, `find`, `wc`).
//!
//! Every collaborator process goes through [`CommandRunner`] so request
//! handling can be exercised against canned output in tests.

use crate::error::{RepoTableError, Result};
use std::process::Output;
use std::time::Duration;
use tracing::{debug, warn};

/// Runs a program and returns its combined stdout/stderr, trimmed.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

impl<R: CommandRunner + ?Sized> CommandRunner for &R {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).run(program, args)
    }
}

impl<R: CommandRunner + ?Sized> CommandRunner for Box<R> {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        (**self).run(program, args)
    }
}

/// Spawns real child processes.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    /// A zero `timeout` waits for the child indefinitely.
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn wait(&self, expr: duct::Expression, command: &str) -> Result<Output> {
        let spawn_err = |source: std::io::Error| RepoTableError::CommandSpawn {
            command: command.to_string(),
            source,
        };

        if self.timeout.is_zero() {
            return expr.run().map_err(spawn_err);
        }

        let handle = expr.start().map_err(spawn_err)?;
        match handle.wait_timeout(self.timeout)? {
            Some(output) => Ok(output.clone()),
            None => {
                handle.kill()?;
                Err(RepoTableError::CommandTimedOut {
                    command: command.to_string(),
                    timeout: self.timeout,
                })
            }
        }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(Duration::from_secs(600))
    }
}

impl CommandRunner for SystemRunner {
    #[tracing::instrument(level = "debug", skip(self, args), fields(arg_count = args.len()))]
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        let command = command_line(program, args);
        debug!(%command, "Running command");

        let expr = duct::cmd(program, args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin_null()
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked();

        let output = match self.wait(expr, &command) {
            Ok(output) => output,
            Err(e) => {
                warn!(error = %e, %command, "Command execution failed");
                return Err(e);
            }
        };

        let text = String::from_utf8_lossy(&output.stdout);
        if !output.status.success() {
            warn!(
                status = %output.status,
                %command,
                output = %text,
                "Command execution failed"
            );
            return Err(RepoTableError::CommandFailed {
                command,
                status: output.status.to_string(),
                output: text.trim().to_string(),
            });
        }

        Ok(text.trim().to_string())
    }
}

pub fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_line_joins_program_and_args() {
        assert_eq!(
            command_line("git", &["clone", "--", "url", "dest"]),
            "git clone -- url dest"
        );
        assert_eq!(command_line("wc", &[]), "wc");
    }

    #[cfg(unix)]
    #[test]
    fn captures_trimmed_combined_output() {
        let runner = SystemRunner::default();
        let out = runner
            .run("sh", &["-c", "echo '  out  '; echo err 1>&2"])
            .unwrap();
        assert_eq!(out, "out  \nerr");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_an_error_with_output() {
        let runner = SystemRunner::default();
        let err = runner.run("sh", &["-c", "echo broken; exit 3"]).unwrap_err();
        match err {
            RepoTableError::CommandFailed { command, output, .. } => {
                assert!(command.starts_with("sh -c"));
                assert_eq!(output, "broken");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn missing_program_is_a_spawn_error() {
        let runner = SystemRunner::default();
        let err = runner
            .run("repotable-no-such-program", &["--flag"])
            .unwrap_err();
        assert!(matches!(err, RepoTableError::CommandSpawn { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn hung_command_times_out() {
        let runner = SystemRunner::new(Duration::from_millis(200));
        let err = runner.run("sleep", &["5"]).unwrap_err();
        assert!(matches!(err, RepoTableError::CommandTimedOut { .. }));
    }
}
