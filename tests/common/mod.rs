// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed profile, a fluent builder for its
// mapping files and contents, and a recording executor so remote plans can
// run without `tar` or `ssh`.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use dotlink::config::{Config, mapping};
use dotlink::error::{ConfigError, ProcessError};
use dotlink::exec::{ExecResult, Executor};
use dotlink::source::{GitSourceProvider, Source};

/// An isolated profile directory backed by a [`tempfile::TempDir`].
pub struct Profile {
    dir: tempfile::TempDir,
}

impl Profile {
    /// Canonical path of the profile root.
    pub fn root(&self) -> PathBuf {
        dunce::canonicalize(self.dir.path()).expect("canonicalize profile root")
    }

    /// Profile root as a source descriptor.
    pub fn source(&self) -> Source {
        Source::Path(self.root())
    }

    /// Resolve the profile's mapping with a provider that never touches git.
    pub fn resolve(&self) -> Result<Config, ConfigError> {
        let cache = tempfile::tempdir().expect("create cache dir");
        mapping::resolve(&self.root(), &provider(cache.path()))
    }
}

/// Fluent builder for [`Profile`].
pub struct ProfileBuilder {
    profile: Profile,
}

impl ProfileBuilder {
    /// Begin building an empty profile.
    pub fn new() -> Self {
        Self {
            profile: Profile {
                dir: tempfile::tempdir().expect("create profile dir"),
            },
        }
    }

    /// Write `content` to `.dotlink` inside `dir` (relative to the root).
    pub fn mapping(self, dir: &str, content: &str) -> Self {
        self.file(&format!("{dir}/.dotlink"), content)
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn file(self, path: &str, content: &str) -> Self {
        let path = self.profile.dir.path().join(path);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write profile file");
        self
    }

    /// Create an empty directory at `path` (relative to the root).
    pub fn dir(self, path: &str) -> Self {
        std::fs::create_dir_all(self.profile.dir.path().join(path)).expect("create dir");
        self
    }

    /// Finish building.
    pub fn build(self) -> Profile {
        self.profile
    }
}

/// A source provider whose git calls all go to a [`RecordingExecutor`].
pub fn provider(cache: &Path) -> GitSourceProvider {
    GitSourceProvider::new(Arc::new(RecordingExecutor::default()), cache.to_path_buf())
}

/// Executor that records every invocation and always succeeds.
///
/// `tar` calls return a fixed fake archive so the bytes handed to `ssh` can
/// be checked.
#[derive(Debug, Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<(Vec<String>, Option<Vec<u8>>)>>,
}

/// Bytes returned by every recorded `tar` invocation.
pub const FAKE_ARCHIVE: &[u8] = b"\x1f\x8bfake";

impl RecordingExecutor {
    /// Recorded `(argv, stdin)` pairs, in call order.
    pub fn calls(&self) -> Vec<(Vec<String>, Option<Vec<u8>>)> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn record(&self, program: &str, args: &[&str], input: Option<&[u8]>) -> ExecResult {
        let argv: Vec<String> = std::iter::once(program)
            .chain(args.iter().copied())
            .map(String::from)
            .collect();
        self.calls
            .lock()
            .expect("calls lock")
            .push((argv, input.map(<[u8]>::to_vec)));
        ExecResult {
            stdout: if program == "tar" {
                FAKE_ARCHIVE.to_vec()
            } else {
                Vec::new()
            },
            stderr: String::new(),
            success: true,
            code: Some(0),
        }
    }
}

impl Executor for RecordingExecutor {
    fn run(&self, program: &str, args: &[&str]) -> Result<ExecResult, ProcessError> {
        Ok(self.record(program, args, None))
    }

    fn run_in(
        &self,
        _dir: &Path,
        program: &str,
        args: &[&str],
    ) -> Result<ExecResult, ProcessError> {
        Ok(self.record(program, args, None))
    }

    fn run_with_input(
        &self,
        program: &str,
        args: &[&str],
        input: &[u8],
    ) -> Result<ExecResult, ProcessError> {
        Ok(self.record(program, args, Some(input)))
    }

    fn which(&self, _program: &str) -> bool {
        true
    }
}

/// Replace each path in `replacements` with its placeholder.
pub fn redact(text: &str, replacements: &[(&Path, &str)]) -> String {
    replacements
        .iter()
        .fold(text.to_string(), |acc, (path, placeholder)| {
            acc.replace(&path.display().to_string(), placeholder)
        })
}
