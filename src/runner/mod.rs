// src/runner/mod.rs

//! Execution of the vendor command-line tools
//!
//! Every interaction with a controller goes through a local executable
//! (`racadm` or `ipmitool`). This module runs an argument vector, captures
//! stdout/stderr/exit status, and optionally turns a non-zero exit into
//! [`Error::ShellExecution`]. Retry policy lives with the resources, not here.
//!
//! - Stdin is nulled so a tool prompting for input cannot hang the run
//! - An optional timeout is imposed with `wait-timeout`; there is none by default
//! - Passwords are redacted from every logged or reported command line

pub mod mock;

use crate::error::{Error, Result};
use std::io::Read;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, warn};
use wait_timeout::ChildExt;

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// Exit code, `None` if the process was killed by a signal
    pub exit_code: Option<i32>,
}

impl CommandOutput {
    /// Successful output carrying `stdout`
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: Some(0),
        }
    }

    /// Failed output (exit code 1) carrying `stderr`
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: stderr.into(),
            exit_code: Some(1),
        }
    }

    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Convert a failed output into [`Error::ShellExecution`]
    pub fn into_error(self, command: String) -> Error {
        Error::ShellExecution {
            command,
            exit_code: self.exit_code,
            stdout: self.stdout,
            stderr: self.stderr,
        }
    }
}

/// Runs external commands on behalf of a backend
pub trait CommandRunner: Send + Sync {
    /// Run `argv` to completion.
    ///
    /// With `force_fail` set, a non-zero exit is returned as
    /// [`Error::ShellExecution`]; otherwise the caller inspects the output.
    fn run(&self, argv: &[String], force_fail: bool) -> Result<CommandOutput>;

    /// Block for `duration` without polling the controller.
    fn settle(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Runner backed by real subprocesses
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill any invocation that runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], force_fail: bool) -> Result<CommandOutput> {
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| Error::InvalidValue("empty command line".to_string()))?;
        let shown = redact(argv);
        debug!("Running: {}", shown);

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                command: shown.clone(),
                source,
            })?;

        // Pipes are drained while waiting so a chatty tool cannot stall on a
        // full pipe buffer
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.timeout {
            Some(timeout) => match child.wait_timeout(timeout) {
                Ok(Some(status)) => status,
                Ok(None) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(Error::Timeout {
                        command: shown,
                        secs: timeout.as_secs(),
                    });
                }
                Err(e) => {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(e.into());
                }
            },
            None => child.wait()?,
        };

        let result = CommandOutput {
            stdout: String::from_utf8_lossy(&collect(stdout)).into_owned(),
            stderr: String::from_utf8_lossy(&collect(stderr)).into_owned(),
            exit_code: status.code(),
        };

        if !result.success() {
            for line in result.stderr.lines().filter(|l| !l.trim().is_empty()) {
                warn!("[{}] {}", program, line);
            }
            if force_fail {
                return Err(result.into_error(shown));
            }
        }

        Ok(result)
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn collect(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Render a command line for logs and errors with passwords masked.
///
/// Masks the value after `-P`, the password of `user test <id> <size> <pw>`
/// and the password of `user set password <id> <pw>`.
pub fn redact(argv: &[String]) -> String {
    let mut shown: Vec<&str> = argv.iter().map(String::as_str).collect();

    for i in 0..shown.len() {
        if shown[i] == "-P" && i + 1 < shown.len() {
            shown[i + 1] = "****";
        }
    }

    if let Some(pos) = shown.iter().position(|a| *a == "user") {
        let rest = &shown[pos + 1..];
        let secret = match rest {
            ["test", _, _, _, ..] => Some(pos + 4),
            ["set", "password", _, _, ..] => Some(pos + 4),
            _ => None,
        };
        if let Some(idx) = secret {
            shown[idx] = "****";
        }
    }

    shown.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(s: &str) -> Vec<String> {
        s.split_whitespace().map(String::from).collect()
    }

    #[test]
    fn test_redact_credentials_flag() {
        let line = redact(&argv("ipmitool -H bmc01 -U ADMIN -P hunter2 lan print 1"));
        assert_eq!(line, "ipmitool -H bmc01 -U ADMIN -P **** lan print 1");
    }

    #[test]
    fn test_redact_user_test_and_set() {
        assert_eq!(
            redact(&argv("ipmitool user test 2 20 s3cret")),
            "ipmitool user test 2 20 ****"
        );
        assert_eq!(
            redact(&argv("ipmitool user set password 2 s3cret")),
            "ipmitool user set password 2 ****"
        );
        assert_eq!(redact(&argv("ipmitool user list")), "ipmitool user list");
    }

    #[test]
    fn test_system_runner_captures_output() {
        let runner = SystemRunner::new();
        let cmd = vec!["sh".to_string(), "-c".to_string(), "echo hello".to_string()];
        let out = runner.run(&cmd, true).unwrap();
        assert!(out.success());
        assert_eq!(out.stdout, "hello\n");
    }

    #[test]
    fn test_system_runner_force_fail() {
        let runner = SystemRunner::new();
        let cmd = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];

        let err = runner.run(&cmd, true).unwrap_err();
        match err {
            Error::ShellExecution { exit_code, .. } => assert_eq!(exit_code, Some(3)),
            other => panic!("unexpected error: {other}"),
        }

        let out = runner.run(&cmd, false).unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert!(!out.success());
    }

    #[test]
    fn test_system_runner_timeout() {
        let runner = SystemRunner::new().with_timeout(Duration::from_millis(100));
        let cmd = vec!["sleep".to_string(), "5".to_string()];
        let err = runner.run(&cmd, true).unwrap_err();
        assert!(matches!(err, Error::Timeout { .. }));
    }

    #[test]
    fn test_system_runner_large_output_with_timeout() {
        let runner = SystemRunner::new().with_timeout(Duration::from_secs(10));
        let cmd = vec![
            "sh".to_string(),
            "-c".to_string(),
            "head -c 1048576 /dev/zero".to_string(),
        ];
        let out = runner.run(&cmd, true).unwrap();
        assert_eq!(out.stdout.len(), 1048576);
    }

    #[test]
    fn test_empty_command_rejected() {
        let runner = SystemRunner::new();
        assert!(runner.run(&[], true).is_err());
    }
}
