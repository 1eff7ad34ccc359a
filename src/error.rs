//! Domain-specific error types for the dotlink engine.
//!
//! This module provides a structured error hierarchy using [`thiserror`].
//! Library modules return typed errors (e.g., [`ConfigError`], [`ActionError`])
//! while the command handler at the CLI boundary converts them to
//! [`anyhow::Error`] via the standard `?` operator.
//!
//! # Error hierarchy
//!
//! ```text
//! DotlinkError
//! ├── Config(ConfigError)   — mapping discovery, include resolution
//! ├── Source(SourceError)   — materializing a source descriptor
//! ├── Plan(PlanError)       — method selection, staging setup
//! ├── Action(ActionError)   — prepare/execute of copy, symlink, transfer
//! └── Process(ProcessError) — external tool invocation (git, tar, ssh)
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the dotlink engine.
#[derive(Error, Debug)]
pub enum DotlinkError {
    /// Mapping file could not be found or resolved.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Source descriptor could not be turned into a local directory.
    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    /// Plan could not be built.
    #[error("Plan error: {0}")]
    Plan(#[from] PlanError),

    /// An action failed during prepare or execute.
    #[error("Action failed: {0}")]
    Action(#[from] ActionError),

    /// An external process failed.
    #[error("Process error: {0}")]
    Process(#[from] ProcessError),
}

/// Errors raised while discovering and resolving mapping files.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Neither `.dotlink` nor `dotlink` exists in the directory.
    #[error("no dotlink mapping found in {}", .root.display())]
    MappingNotFound {
        /// Directory that was searched.
        root: PathBuf,
    },

    /// An include directive is malformed or unsafe.
    #[error("{}:{line}: {message}", .file.display())]
    InvalidPlan {
        /// Mapping file containing the directive.
        file: PathBuf,
        /// 1-based line number of the directive.
        line: usize,
        /// What is wrong with the directive.
        message: String,
    },

    /// An include chain leads back to a directory already being resolved.
    #[error("include cycle detected at {}", .path.display())]
    IncludeCycle {
        /// Directory that was visited twice.
        path: PathBuf,
    },

    /// An included source could not be materialized.
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Reading the mapping file or resolving a path failed.
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        /// Path that could not be read or resolved.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
}

/// Errors raised while materializing a source descriptor.
#[derive(Error, Debug)]
pub enum SourceError {
    /// The source does not exist or is not usable.
    #[error("source {descriptor} unavailable: {reason}")]
    Unavailable {
        /// The descriptor as given by the user.
        descriptor: String,
        /// Human-readable reason.
        reason: String,
    },

    /// Fetching a remote repository failed.
    #[error("failed to fetch {descriptor}")]
    Fetch {
        /// The repository URL.
        descriptor: String,
        /// Underlying process failure.
        source: ProcessError,
    },
}

/// Errors raised by actions during prepare or execute.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The copy or symlink source does not exist.
    #[error("{} does not exist", .0.display())]
    SourceNotFound(PathBuf),

    /// Destination exists with a different file/directory kind than the source.
    #[error("file/dir type mismatch {} != {}", .src.display(), .dest.display())]
    TypeMismatch {
        /// Action source.
        src: PathBuf,
        /// Conflicting destination.
        dest: PathBuf,
    },

    /// A symlink would replace a real directory.
    #[error("symlink destination {} is a directory", .0.display())]
    DirectoryConflict(PathBuf),

    /// A remote transfer was planned with an unusable staging dir or target.
    #[error("invalid remote transfer: {0}")]
    InvalidTransfer(String),

    /// Symlinks are not supported on this platform.
    #[error("symlinks are not supported on this platform, use --copy")]
    SymlinkUnsupported,

    /// A filesystem operation failed.
    #[error("{op} {}: {source}", .path.display())]
    Io {
        /// Short description of the operation.
        op: &'static str,
        /// Path the operation was applied to.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// An external process run by the action failed.
    #[error(transparent)]
    Process(#[from] ProcessError),
}

/// Errors raised while building a plan.
#[derive(Error, Debug)]
pub enum PlanError {
    /// The requested deployment method is not known.
    #[error("unknown deployment method '{0}': expected copy or symlink")]
    UnknownMethod(String),

    /// The local staging directory for a remote deployment could not be created.
    #[error("failed to create staging directory: {0}")]
    Staging(io::Error),

    /// Flattening the configuration failed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors raised when running external programs.
#[derive(Error, Debug)]
pub enum ProcessError {
    /// The program could not be started.
    #[error("failed to execute: {program}")]
    Spawn {
        /// Program name.
        program: String,
        /// Underlying I/O error.
        source: io::Error,
    },

    /// The program ran but exited non-zero.
    #[error("{label} failed (exit {}): {}", .code.unwrap_or(-1), .stderr.trim())]
    Failed {
        /// Program name and context.
        label: String,
        /// Exit code, if the process was not killed by a signal.
        code: Option<i32>,
        /// Captured standard error.
        stderr: String,
    },

    /// Writing standard input to the program failed.
    #[error("failed to write input to {label}: {source}")]
    Stdin {
        /// Program name and arguments.
        label: String,
        /// Underlying I/O error.
        source: io::Error,
    },
}
