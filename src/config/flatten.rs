//! Flattening a [`Config`] tree into absolute source/destination pairs.
use std::path::{Path, PathBuf};

use super::Config;
use crate::error::ConfigError;

/// An absolute source path and the absolute destination it deploys to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPair {
    /// File or directory inside the profile.
    pub source: PathBuf,
    /// Where it ends up under the output root.
    pub destination: PathBuf,
}

impl Config {
    /// Produce every mapping of the tree as absolute paths under `output_root`.
    ///
    /// Includes come first, depth-first in directive order, followed by the
    /// node's own mappings.  Consumers that apply pairs in order therefore
    /// let a parent's mapping override an included one for the same
    /// destination.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if `output_root` cannot be made absolute
    /// (e.g. it is empty).
    pub fn flatten(&self, output_root: &Path) -> Result<Vec<PathPair>, ConfigError> {
        let output_root = std::path::absolute(output_root).map_err(|source| ConfigError::Io {
            path: output_root.to_path_buf(),
            source,
        })?;
        let mut pairs = Vec::with_capacity(self.len());
        self.flatten_into(&output_root, &mut pairs);
        Ok(pairs)
    }

    fn flatten_into(&self, output_root: &Path, pairs: &mut Vec<PathPair>) {
        for include in self.includes() {
            include.flatten_into(output_root, pairs);
        }
        pairs.extend(self.paths().map(|(dest, src)| PathPair {
            source: self.root().join(src),
            destination: output_root.join(dest),
        }));
    }
}
