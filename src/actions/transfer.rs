//! Remote transfer: ship the staging directory to a remote host over SSH.
use std::path::PathBuf;
use std::sync::Arc;

use super::Operation;
use crate::error::ActionError;
use crate::exec::Executor;
use crate::target::Target;

/// Archive a local staging directory and extract it on a remote target.
///
/// The archive is built with `tar -czf - -C <staging> .` and piped to
/// `ssh <address> tar -xz -f- [-C <path>]`.
#[derive(Debug, Clone)]
pub struct RemoteTransfer {
    /// Local directory whose contents are transferred.
    pub staging: PathBuf,
    /// Remote destination.
    pub target: Target,
    executor: Arc<dyn Executor>,
}

impl RemoteTransfer {
    /// Create a new remote transfer using `executor` to run `tar` and `ssh`.
    #[must_use]
    pub fn new(staging: PathBuf, target: Target, executor: Arc<dyn Executor>) -> Self {
        Self {
            staging,
            target,
            executor,
        }
    }

    /// Arguments passed to `ssh` for the extracting side.
    fn remote_args(&self) -> Vec<String> {
        let mut args = vec![
            self.target.address(),
            "tar".to_string(),
            "-xz".to_string(),
            "-f-".to_string(),
        ];
        let path = self.target.path.to_string_lossy();
        if !path.is_empty() {
            args.push("-C".to_string());
            args.push(shell_quote(&path));
        }
        args
    }
}

impl PartialEq for RemoteTransfer {
    fn eq(&self, other: &Self) -> bool {
        self.staging == other.staging && self.target == other.target
    }
}

impl Eq for RemoteTransfer {}

impl Operation for RemoteTransfer {
    fn description(&self) -> String {
        format!("{} -> {}", self.staging.display(), self.target)
    }

    fn prepare(&self) -> Result<(), ActionError> {
        if !self.staging.is_dir() {
            return Err(ActionError::InvalidTransfer(format!(
                "{} is not a directory",
                self.staging.display()
            )));
        }
        if !self.target.is_remote() {
            return Err(ActionError::InvalidTransfer(format!(
                "target {} is not remote",
                self.target
            )));
        }
        Ok(())
    }

    fn execute(&self) -> Result<(), ActionError> {
        let staging = self.staging.to_string_lossy();
        let archive = self
            .executor
            .run("tar", &["-czf", "-", "-C", &*staging, "."])?;
        tracing::debug!(
            "archived {} ({} bytes compressed)",
            self.staging.display(),
            archive.stdout.len()
        );

        let args = self.remote_args();
        let args: Vec<&str> = args.iter().map(String::as_str).collect();
        self.executor.run_with_input("ssh", &args, &archive.stdout)?;
        Ok(())
    }
}

/// Quote `value` for the remote shell that `ssh` hands the command to.
fn shell_quote(value: &str) -> String {
    if !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "/._-~+,:@%=".contains(c))
    {
        return value.to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}
