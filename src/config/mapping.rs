//! Mapping file discovery and recursive resolution.
//!
//! A mapping file holds one directive per line:
//!
//! ```text
//! # comment
//! @relative/dir          include another profile directory
//! .gitconfig = git/config   destination = source
//! .vimrc                 shorthand for `.vimrc = .vimrc`
//! ```
use std::path::{Component, Path, PathBuf};

use super::Config;
use crate::error::ConfigError;
use crate::source::{Source, SourceProvider};

/// Candidate mapping file names, in lookup order.
pub const MAPPING_NAMES: [&str; 2] = [".dotlink", "dotlink"];

const COMMENT: char = '#';
const INCLUDE: char = '@';
const SEPARATOR: char = '=';
const OUTSIDE_TARGET: &str = "destination must be a relative path inside the target";
const OUTSIDE_PROFILE: &str = "is outside the profile: non-relative include paths not allowed";

/// Find the mapping file inside `root`.
///
/// # Errors
///
/// Returns [`ConfigError::MappingNotFound`] if no candidate file exists.
pub fn discover(root: &Path) -> Result<PathBuf, ConfigError> {
    MAPPING_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .inspect(|path| tracing::debug!("using mapping file {}", path.display()))
        .ok_or_else(|| ConfigError::MappingNotFound {
            root: root.to_path_buf(),
        })
}

/// Parse the mapping file in `root`, following includes.
///
/// Include directives naming URLs, and the directories of local includes,
/// are turned into local directories through `sources`.  Source paths are
/// not checked for existence here; actions do that when they are prepared.
///
/// # Errors
///
/// Returns an error if a mapping file is missing or unreadable, an include
/// is a file, missing, escapes its profile root, or forms a cycle, or an
/// included source cannot be materialized.
pub fn resolve(root: &Path, sources: &dyn SourceProvider) -> Result<Config, ConfigError> {
    Resolver {
        sources,
        stack: Vec::new(),
    }
    .resolve(root)
}

struct Resolver<'a> {
    sources: &'a dyn SourceProvider,
    /// Canonical roots currently being resolved, outermost first.
    stack: Vec<PathBuf>,
}

/// Location of an include directive, for error reporting.
struct Directive<'a> {
    file: &'a Path,
    line: usize,
    text: &'a str,
}

impl Directive<'_> {
    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidPlan {
            file: self.file.to_path_buf(),
            line: self.line,
            message: format!("{} {reason}", self.text),
        }
    }
}

impl Resolver<'_> {
    fn resolve(&mut self, root: &Path) -> Result<Config, ConfigError> {
        let root = dunce::canonicalize(root).map_err(|source| ConfigError::Io {
            path: root.to_path_buf(),
            source,
        })?;
        if self.stack.contains(&root) {
            return Err(ConfigError::IncludeCycle { path: root });
        }

        let file = discover(&root)?;
        let content = std::fs::read_to_string(&file).map_err(|source| ConfigError::Io {
            path: file.clone(),
            source,
        })?;

        self.stack.push(root.clone());
        let mut config = Config::new(root);

        for (index, line) in content.lines().enumerate() {
            if line.trim_start().starts_with(COMMENT) {
                continue;
            }

            let directive = Directive {
                file: &file,
                line: index + 1,
                text: line.trim(),
            };
            if let Some(value) = line.strip_prefix(INCLUDE) {
                let include = self.include(config.root(), &directive, value.trim())?;
                config.push_include(include);
            } else if let Some((left, right)) = line.split_once(SEPARATOR) {
                let destination = destination(&directive, left.trim())?;
                config.insert_path(destination, PathBuf::from(right.trim()));
            } else if !directive.text.is_empty() {
                let destination = destination(&directive, directive.text)?;
                config.insert_path(destination, PathBuf::from(directive.text));
            }
        }

        self.stack.pop();
        Ok(config)
    }

    fn include(
        &mut self,
        root: &Path,
        directive: &Directive<'_>,
        value: &str,
    ) -> Result<Config, ConfigError> {
        let subpath = match Source::parse(value) {
            url @ Source::Url { .. } => {
                let dir = self.sources.materialize(&url)?;
                tracing::debug!("including {url} from {}", dir.display());
                return self.resolve(&dir);
            }
            Source::Path(subpath) => subpath,
        };

        let candidate = normalize(&root.join(subpath));
        if value.is_empty() || !is_strictly_inside(&candidate, root) {
            return Err(directive.invalid(OUTSIDE_PROFILE));
        }
        if candidate.symlink_metadata().is_err() {
            return Err(directive.invalid("not found"));
        }

        let real = dunce::canonicalize(&candidate).map_err(|_| directive.invalid("not found"))?;
        if !is_strictly_inside(&real, root) {
            return Err(directive.invalid(OUTSIDE_PROFILE));
        }
        if real.is_file() {
            return Err(directive.invalid("is a file"));
        }

        let dir = self.sources.materialize(&Source::Path(real))?;
        tracing::debug!("including {}", dir.display());
        self.resolve(&dir)
    }
}

/// Check that a destination stays inside the output root once joined to it.
fn destination(directive: &Directive<'_>, value: &str) -> Result<PathBuf, ConfigError> {
    let path = PathBuf::from(value);
    let mut depth = 0_usize;
    for component in path.components() {
        depth = match component {
            Component::Normal(_) => depth + 1,
            Component::CurDir => depth,
            Component::ParentDir => depth
                .checked_sub(1)
                .ok_or_else(|| directive.invalid(OUTSIDE_TARGET))?,
            Component::RootDir | Component::Prefix(_) => {
                return Err(directive.invalid(OUTSIDE_TARGET));
            }
        };
    }
    if depth == 0 {
        return Err(directive.invalid(OUTSIDE_TARGET));
    }
    Ok(path)
}

/// Collapse `.` and `..` components without touching the filesystem.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other),
        }
    }
    out
}

fn is_strictly_inside(path: &Path, root: &Path) -> bool {
    path != root && path.starts_with(root)
}
