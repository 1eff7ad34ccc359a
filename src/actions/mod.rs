//! Deployment actions and their two-phase prepare/execute contract.
//!
//! Every action is first prepared (validated, with parent directories
//! created) and only then executed.  A [`Plan`](crate::plan::Plan) prepares
//! all of its actions before executing any of them.
pub mod copy;
pub mod fs;
pub mod symlink;
pub mod transfer;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

pub use copy::CopyAction;
pub use symlink::SymlinkAction;
pub use transfer::RemoteTransfer;

use crate::error::ActionError;
use crate::exec::Executor;
use crate::target::Target;

/// Shared behaviour of every deployment step.
pub trait Operation {
    /// Human-readable `source -> destination` summary.
    fn description(&self) -> String;

    /// Validate preconditions without touching the destination itself.
    ///
    /// # Errors
    ///
    /// Returns an error if the action cannot be executed.
    fn prepare(&self) -> Result<(), ActionError>;

    /// Perform the action.  Only valid after a successful [`prepare`](Self::prepare).
    ///
    /// # Errors
    ///
    /// Returns an error if a filesystem operation or external process fails.
    fn execute(&self) -> Result<(), ActionError>;
}

/// One step of a deployment plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Copy a file or merge a directory.
    Copy(CopyAction),
    /// Point a symlink at a profile entry.
    Symlink(SymlinkAction),
    /// Ship a staging directory to a remote host.
    RemoteTransfer(RemoteTransfer),
}

impl Action {
    /// A copy from `source` to `destination`.
    #[must_use]
    pub const fn copy(source: PathBuf, destination: PathBuf) -> Self {
        Self::Copy(CopyAction::new(source, destination))
    }

    /// A symlink at `destination` pointing to `source`.
    #[must_use]
    pub const fn symlink(source: PathBuf, destination: PathBuf) -> Self {
        Self::Symlink(SymlinkAction::new(source, destination))
    }

    /// A transfer of `staging` to the remote `target`.
    #[must_use]
    pub fn remote_transfer(staging: PathBuf, target: Target, executor: Arc<dyn Executor>) -> Self {
        Self::RemoteTransfer(RemoteTransfer::new(staging, target, executor))
    }

    /// Variant name as shown in plan listings.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Copy(_) => "Copy",
            Self::Symlink(_) => "Symlink",
            Self::RemoteTransfer(_) => "RemoteTransfer",
        }
    }

    fn operation(&self) -> &dyn Operation {
        match self {
            Self::Copy(a) => a,
            Self::Symlink(a) => a,
            Self::RemoteTransfer(a) => a,
        }
    }
}

impl Operation for Action {
    fn description(&self) -> String {
        self.operation().description()
    }

    fn prepare(&self) -> Result<(), ActionError> {
        self.operation().prepare()
    }

    fn execute(&self) -> Result<(), ActionError> {
        self.operation().execute()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.description())
    }
}
