//! Command-line interface.
use std::path::PathBuf;

use clap::{ArgGroup, Parser};

use crate::plan::Method;

const VERSION: &str = match option_env!("DOTLINK_VERSION") {
    Some(version) => version,
    None => env!("CARGO_PKG_VERSION"),
};

/// Deploy dotfiles from a profile to a local directory or a remote host.
#[derive(Parser, Debug)]
#[command(
    name = "dotlink",
    about = "Deploy dotfiles from a profile directory or git repository",
    version = VERSION,
    group(ArgGroup::new("method_choice").args(["copy", "symlink", "method"]))
)]
pub struct Cli {
    /// Profile directory or git URL (`URL#ref` selects a branch, tag or commit)
    #[arg(default_value = ".")]
    pub source: String,

    /// Target directory, or `[user@]host:path` for a remote host [default: home directory]
    pub target: Option<String>,

    /// Print the plan without executing it
    #[arg(short = 'n', long, visible_alias = "plan")]
    pub dry_run: bool,

    /// Copy files instead of symlinking them
    #[arg(long)]
    pub copy: bool,

    /// Symlink files into place (default)
    #[arg(long)]
    pub symlink: bool,

    /// Deployment method
    #[arg(short, long, value_name = "copy|symlink", value_parser = parse_method)]
    pub method: Option<Method>,

    /// Enable verbose output
    #[arg(short, long, visible_alias = "debug", visible_short_alias = 'D')]
    pub verbose: bool,

    /// Directory used to cache cloned repositories
    #[arg(long, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,
}

impl Cli {
    /// Method selected by `--copy`, `--symlink` or `--method`.
    #[must_use]
    pub fn deploy_method(&self) -> Method {
        if self.copy {
            Method::Copy
        } else if self.symlink {
            Method::Symlink
        } else {
            self.method.unwrap_or_default()
        }
    }
}

fn parse_method(value: &str) -> Result<Method, String> {
    value.parse::<Method>().map_err(|e| e.to_string())
}
