//! Source descriptors and their materialization into local directories.
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sha2::{Digest as _, Sha256};

use crate::error::SourceError;
use crate::exec::Executor;

/// Where a dotfile profile comes from.
///
/// # Examples
///
/// ```
/// use dotlink::source::Source;
///
/// assert!(matches!(Source::parse("."), Source::Path(_)));
/// assert_eq!(
///     Source::parse("https://github.com/amy/dotfiles.git#main"),
///     Source::Url {
///         url: "https://github.com/amy/dotfiles.git".into(),
///         reference: Some("main".into()),
///     }
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Source {
    /// A directory on the local filesystem.
    Path(PathBuf),
    /// A git repository, optionally pinned to a branch, tag, or commit.
    Url {
        /// Repository URL without the `#ref` suffix.
        url: String,
        /// Branch, tag, or commit to check out.
        reference: Option<String>,
    },
}

impl Source {
    /// Parse a descriptor string.
    ///
    /// A value is a URL when it has both a scheme and a network location
    /// (`scheme://host...`); everything else is a local path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        if !is_url(value) {
            return Self::Path(PathBuf::from(value));
        }
        match value.rsplit_once('#') {
            Some((url, reference)) => Self::Url {
                url: url.to_string(),
                reference: (!reference.is_empty()).then(|| reference.to_string()),
            },
            None => Self::Url {
                url: value.to_string(),
                reference: None,
            },
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Path(path) => write!(f, "{}", path.display()),
            Self::Url {
                url,
                reference: Some(reference),
            } => write!(f, "{url}#{reference}"),
            Self::Url {
                url,
                reference: None,
            } => write!(f, "{url}"),
        }
    }
}

/// `scheme://netloc...` with a syntactically valid scheme and non-empty netloc.
fn is_url(value: &str) -> bool {
    let Some((scheme, rest)) = value.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    let valid_scheme = chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'));
    let netloc = rest.split(['/', '?', '#']).next().unwrap_or_default();
    valid_scheme && !netloc.is_empty()
}

/// Turns a [`Source`] into a local directory.
pub trait SourceProvider: fmt::Debug {
    /// Return a local directory holding the contents of `source`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the source does not exist or cannot be
    /// fetched.
    fn materialize(&self, source: &Source) -> Result<PathBuf, SourceError>;
}

/// Resolves local paths directly and fetches URLs with `git` into a cache.
///
/// Each repository (URL plus ref) gets its own checkout under `cache_dir`,
/// named after a hash of the descriptor, and is refreshed with a shallow
/// fetch the first time it is requested in a run.
#[derive(Debug)]
pub struct GitSourceProvider {
    executor: Arc<dyn Executor>,
    cache_dir: PathBuf,
    fetched: Mutex<HashMap<Source, PathBuf>>,
}

impl GitSourceProvider {
    /// Create a provider that keeps checkouts under `cache_dir`.
    #[must_use]
    pub fn new(executor: Arc<dyn Executor>, cache_dir: PathBuf) -> Self {
        Self {
            executor,
            cache_dir,
            fetched: Mutex::new(HashMap::new()),
        }
    }

    fn fetch(
        &self,
        descriptor: &str,
        url: &str,
        reference: Option<&str>,
    ) -> Result<PathBuf, SourceError> {
        let unavailable = |reason: String| SourceError::Unavailable {
            descriptor: descriptor.to_string(),
            reason,
        };

        if !self.executor.which("git") {
            return Err(unavailable("git not found on PATH".to_string()));
        }

        let checkout = self.cache_dir.join(cache_key(descriptor));
        let git = |args: &[&str]| {
            self.executor
                .run_in(&checkout, "git", args)
                .map_err(|source| SourceError::Fetch {
                    descriptor: descriptor.to_string(),
                    source,
                })
        };

        if !checkout.join(".git").is_dir() {
            if checkout.exists() {
                std::fs::remove_dir_all(&checkout).map_err(|e| {
                    unavailable(format!("remove stale checkout {}: {e}", checkout.display()))
                })?;
            }
            std::fs::create_dir_all(&checkout).map_err(|e| {
                unavailable(format!("create checkout {}: {e}", checkout.display()))
            })?;
            tracing::debug!("cloning {url} into {}", checkout.display());
            git(&["init", "--quiet"])?;
            git(&["remote", "add", "origin", url])?;
        }

        git(&["fetch", "--depth=1", "--quiet", "origin", reference.unwrap_or("HEAD")])?;
        git(&["checkout", "--force", "--quiet", "FETCH_HEAD"])?;
        Ok(checkout)
    }
}

impl SourceProvider for GitSourceProvider {
    fn materialize(&self, source: &Source) -> Result<PathBuf, SourceError> {
        match source {
            Source::Path(path) => local_directory(path),
            Source::Url { url, reference } => {
                if let Some(dir) = self
                    .fetched
                    .lock()
                    .ok()
                    .and_then(|guard| guard.get(source).cloned())
                {
                    return Ok(dir);
                }
                let dir = self.fetch(&source.to_string(), url, reference.as_deref())?;
                if let Ok(mut guard) = self.fetched.lock() {
                    guard.insert(source.clone(), dir.clone());
                }
                Ok(dir)
            }
        }
    }
}

fn local_directory(path: &Path) -> Result<PathBuf, SourceError> {
    if path.is_dir() {
        return Ok(path.to_path_buf());
    }
    let reason = if path.exists() {
        "not a directory"
    } else {
        "does not exist"
    };
    Err(SourceError::Unavailable {
        descriptor: path.display().to_string(),
        reason: reason.to_string(),
    })
}

/// First 16 hex characters of the SHA-256 of `descriptor`.
fn cache_key(descriptor: &str) -> String {
    Sha256::digest(descriptor.as_bytes())
        .iter()
        .take(8)
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Default checkout cache: `$XDG_CACHE_HOME/dotlink/repos` (or
/// `~/.cache/dotlink/repos`).
#[must_use]
pub fn default_cache_dir() -> Option<PathBuf> {
    let cache_dir = std::env::var_os("XDG_CACHE_HOME")
        .map(PathBuf::from)
        .or_else(|| {
            std::env::var_os("HOME")
                .or_else(|| std::env::var_os("USERPROFILE"))
                .map(|home| PathBuf::from(home).join(".cache"))
        })?;
    Some(cache_dir.join("dotlink").join("repos"))
}
