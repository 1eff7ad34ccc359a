//! Resolved mapping configuration.
//!
//! A [`Config`] is the tree produced by [`mapping::resolve`]: one node per
//! mapping file, each owning the nodes it includes.  [`Config::flatten`]
//! turns the tree into absolute [`PathPair`]s against an output directory.
pub mod flatten;
pub mod mapping;

use std::path::{Path, PathBuf};

pub use flatten::PathPair;
pub use mapping::{discover, resolve};

/// One resolved mapping file and everything it includes.
///
/// Built once by the resolver and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    root: PathBuf,
    paths: Vec<(PathBuf, PathBuf)>,
    includes: Vec<Self>,
}

impl Config {
    /// Create an empty node rooted at `root`.
    ///
    /// `root` is expected to be canonical; the resolver guarantees this.
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            paths: Vec::new(),
            includes: Vec::new(),
        }
    }

    /// Add a `destination = source` mapping (builder style).
    #[must_use]
    pub fn with_path(
        mut self,
        destination: impl Into<PathBuf>,
        source: impl Into<PathBuf>,
    ) -> Self {
        self.insert_path(destination.into(), source.into());
        self
    }

    /// Append an included node (builder style).
    #[must_use]
    pub fn with_include(mut self, include: Self) -> Self {
        self.includes.push(include);
        self
    }

    /// Directory the mapping file lives in.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `(destination, source)` mappings relative to the output root and
    /// [`root`](Self::root) respectively, in the order they were parsed.
    pub fn paths(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.paths
            .iter()
            .map(|(dest, src)| (dest.as_path(), src.as_path()))
    }

    /// Included nodes, in directive order.
    #[must_use]
    pub fn includes(&self) -> &[Self] {
        &self.includes
    }

    /// Total number of mappings in this node and all its includes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len() + self.includes.iter().map(Self::len).sum::<usize>()
    }

    /// Whether the tree contains no mappings at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert a mapping; a repeated destination keeps its position and takes
    /// the new source.
    pub(crate) fn insert_path(&mut self, destination: PathBuf, source: PathBuf) {
        if let Some(entry) = self
            .paths
            .iter_mut()
            .find(|(dest, _)| *dest == destination)
        {
            tracing::debug!(
                "duplicate destination {} in {}, using {}",
                destination.display(),
                self.root.display(),
                source.display()
            );
            entry.1 = source;
        } else {
            self.paths.push((destination, source));
        }
    }

    pub(crate) fn push_include(&mut self, include: Self) {
        self.includes.push(include);
    }
}
