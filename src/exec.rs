//! External process execution (`git`, `tar`, `ssh`).
use std::io::{self, Write as _};
use std::path::Path;
use std::process::{Command, Output, Stdio};

use crate::error::ProcessError;

/// Result of a command execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecResult {
    /// Raw standard output (may be binary, e.g. a tar stream).
    pub stdout: Vec<u8>,
    /// Standard error, lossily decoded.
    pub stderr: String,
    /// Whether the process exited with status zero.
    pub success: bool,
    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,
}

impl From<Output> for ExecResult {
    fn from(output: Output) -> Self {
        Self {
            stdout: output.stdout,
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            success: output.status.success(),
            code: output.status.code(),
        }
    }
}

/// Runs external programs on behalf of the engine.
///
/// Every method is blocking and fails with [`ProcessError::Failed`] when the
/// program exits non-zero.  Injected as `Arc<dyn Executor>` so tests can
/// substitute a recording mock.
pub trait Executor: std::fmt::Debug + Send + Sync {
    /// Run `program` with `args` and capture its output.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ProcessError>;

    /// Run `program` with `args` inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started or exits non-zero.
    fn run_in(&self, dir: &Path, program: &str, args: &[&str])
    -> Result<ExecResult, ProcessError>;

    /// Run `program` with `args`, writing `input` to its standard input.
    ///
    /// # Errors
    ///
    /// Returns an error if the program cannot be started, its stdin cannot be
    /// written, or it exits non-zero.
    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExecResult, ProcessError>;

    /// Check whether `program` is available on `PATH`.
    fn which(&self, program: &str) -> bool;
}

/// [`Executor`] backed by [`std::process::Command`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemExecutor;

/// Execute a command and return the result, failing on non-zero exit.
fn execute_checked(
    mut cmd: Command,
    program: &str,
    label: &str,
) -> Result<ExecResult, ProcessError> {
    tracing::debug!("$ {label}");
    let output = cmd.output().map_err(|source| ProcessError::Spawn {
        program: program.to_string(),
        source,
    })?;
    check(ExecResult::from(output), label)
}

fn check(result: ExecResult, label: &str) -> Result<ExecResult, ProcessError> {
    if result.success {
        Ok(result)
    } else {
        Err(ProcessError::Failed {
            label: label.to_string(),
            code: result.code,
            stderr: result.stderr,
        })
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

impl Executor for SystemExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ProcessError> {
        let mut cmd = Command::new(program);
        cmd.args(args);
        execute_checked(cmd, program, &command_line(program, args))
    }

    fn run_in(
        &self,
        dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<ExecResult, ProcessError> {
        let mut cmd = Command::new(program);
        cmd.args(args).current_dir(dir);
        execute_checked(
            cmd,
            program,
            &format!("{} in {}", command_line(program, args), dir.display()),
        )
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExecResult, ProcessError> {
        let label = command_line(program, args);
        tracing::debug!("$ {label} < {} bytes", input.len());
        let spawn_err = |source| ProcessError::Spawn {
            program: program.to_string(),
            source,
        };

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_err)?;

        // The writer runs beside `wait_with_output` so a child blocked on a
        // full stdout or stderr pipe cannot stall the write.  Dropping stdin
        // at the end of the thread closes the pipe so the child sees EOF.
        let stdin = child.stdin.take();
        let (output, written) = std::thread::scope(|scope| {
            let writer = stdin.map(|mut stdin| scope.spawn(move || stdin.write_all(input)));
            let output = child.wait_with_output();
            let written = writer.map_or(Ok(()), |handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(io::Error::other("stdin writer panicked")))
            });
            (output, written)
        });

        let result = check(ExecResult::from(output.map_err(spawn_err)?), &label)?;
        // A child may stop reading early and still succeed.
        if let Err(source) = written
            && source.kind() != io::ErrorKind::BrokenPipe
        {
            return Err(ProcessError::Stdin { label, source });
        }
        Ok(result)
    }

    fn which(&self, program: &str) -> bool {
        which::which(program).is_ok()
    }
}
