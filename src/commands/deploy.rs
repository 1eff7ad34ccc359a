//! Deploy command: resolve a profile and apply or print its plan.
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::Cli;
use crate::config::mapping;
use crate::error::DotlinkError;
use crate::exec::{Executor, SystemExecutor};
use crate::logging::Logger;
use crate::plan::{Method, Plan};
use crate::source::{GitSourceProvider, Source, SourceProvider, default_cache_dir};
use crate::target::Target;

/// Run the deploy command.
///
/// # Errors
///
/// Returns an error if the source cannot be materialized, the mapping cannot
/// be resolved, or any action fails.
pub fn run(cli: &Cli, log: &Logger) -> Result<()> {
    let target = match cli.target.as_deref() {
        Some(value) => Target::parse(value),
        None => Target::local(home_dir().context("cannot determine home directory; pass TARGET")?),
    };
    let method = cli.deploy_method();
    check_method(method, &target)?;

    let cache_dir = match &cli.cache_dir {
        Some(dir) => dir.clone(),
        None => default_cache_dir().context("cannot determine cache directory; use --cache-dir")?,
    };
    let executor: Arc<dyn Executor> = Arc::new(SystemExecutor);
    let sources = GitSourceProvider::new(Arc::clone(&executor), cache_dir);

    log.stage(&format!("Deploying {} to {target}", cli.source));
    let plan = load_plan(&Source::parse(&cli.source), &target, method, &sources, executor)
        .with_context(|| format!("cannot plan deployment of {}", cli.source))?;
    log.debug(&format!("{} actions", plan.len()));
    if plan.is_empty() {
        log.warn(&format!("{} maps nothing; there is nothing to deploy", cli.source));
    }

    if cli.dry_run {
        for line in plan.to_string().lines() {
            log.dry_run(line.trim_start());
        }
        log.dry_run("nothing was changed");
        return Ok(());
    }

    plan.execute(|action| log.info(&action.to_string()))?;
    log.info("done");
    Ok(())
}

/// Materialize `source`, resolve its mapping and build the plan for `target`.
///
/// # Errors
///
/// Returns an error if the source is unavailable, the mapping is missing or
/// invalid, or the plan cannot be built.
pub fn load_plan(
    source: &Source,
    target: &Target,
    method: Method,
    sources: &dyn SourceProvider,
    executor: Arc<dyn Executor>,
) -> Result<Plan, DotlinkError> {
    let root = sources.materialize(source)?;
    let config = mapping::resolve(&root, sources)?;
    tracing::debug!("resolved {} mappings from {}", config.len(), root.display());
    Ok(Plan::build(&config, target, method, executor)?)
}

fn home_dir() -> Option<PathBuf> {
    first_home([std::env::var_os("HOME"), std::env::var_os("USERPROFILE")])
}

/// First non-empty candidate, in order.
fn first_home(candidates: [Option<OsString>; 2]) -> Option<PathBuf> {
    candidates
        .into_iter()
        .flatten()
        .find(|home| !home.is_empty())
        .map(PathBuf::from)
}

/// Reject methods the platform cannot perform for `target`.
fn check_method(method: Method, target: &Target) -> Result<()> {
    if cfg!(windows) && method == Method::Symlink && !target.is_remote() {
        anyhow::bail!("symlinks are not supported on this platform, use --copy");
    }
    Ok(())
}
