//! Turning a resolved [`Config`] into an ordered list of [`Action`]s.
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use tempfile::TempDir;

use crate::actions::{Action, Operation as _};
use crate::config::Config;
use crate::error::{ActionError, PlanError};
use crate::exec::Executor;
use crate::target::Target;

/// How profile entries reach a local destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Method {
    /// Copy files and merge directories.
    Copy,
    /// Link destinations back to the profile.
    #[default]
    Symlink,
}

impl FromStr for Method {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "copy" => Ok(Self::Copy),
            "symlink" => Ok(Self::Symlink),
            _ => Err(PlanError::UnknownMethod(s.to_string())),
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Copy => f.write_str("copy"),
            Self::Symlink => f.write_str("symlink"),
        }
    }
}

/// An ordered deployment plan.
///
/// For remote targets the plan owns a local staging directory that is
/// removed when the plan is dropped.
#[derive(Debug)]
pub struct Plan {
    actions: Vec<Action>,
    staging: Option<TempDir>,
}

impl Plan {
    /// Build the plan deploying `config` to `target`.
    ///
    /// Remote targets always copy into a fresh staging directory and end
    /// with a single [`Action::RemoteTransfer`].
    ///
    /// # Errors
    ///
    /// Returns an error if the staging directory cannot be created or the
    /// output root cannot be made absolute.
    pub fn build(
        config: &Config,
        target: &Target,
        method: Method,
        executor: Arc<dyn Executor>,
    ) -> Result<Self, PlanError> {
        if target.is_remote() {
            let staging = tempfile::Builder::new()
                .prefix("dotlink.")
                .tempdir()
                .map_err(PlanError::Staging)?;
            if method == Method::Symlink {
                tracing::debug!("remote target {target}: deploying by copy");
            }
            let mut actions: Vec<Action> = config
                .flatten(staging.path())?
                .into_iter()
                .map(|pair| Action::copy(pair.source, pair.destination))
                .collect();
            actions.push(Action::remote_transfer(
                staging.path().to_path_buf(),
                target.clone(),
                executor,
            ));
            Ok(Self {
                actions,
                staging: Some(staging),
            })
        } else {
            let actions = config
                .flatten(&target.path)?
                .into_iter()
                .map(|pair| match method {
                    Method::Copy => Action::copy(pair.source, pair.destination),
                    Method::Symlink => Action::symlink(pair.source, pair.destination),
                })
                .collect();
            Ok(Self {
                actions,
                staging: None,
            })
        }
    }

    /// Actions in execution order.
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Number of actions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan does nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Local staging directory, for remote plans.
    #[must_use]
    pub fn staging(&self) -> Option<&std::path::Path> {
        self.staging.as_ref().map(TempDir::path)
    }

    /// Prepare every action, then execute them in order.
    ///
    /// `on_action` is called just before each action executes.  Nothing is
    /// executed unless every action prepares successfully.  The staging
    /// directory is removed when this returns, whatever the outcome.
    ///
    /// # Errors
    ///
    /// Returns the first prepare or execute failure.  Already executed
    /// actions are not rolled back.
    pub fn execute(self, mut on_action: impl FnMut(&Action)) -> Result<(), ActionError> {
        for action in &self.actions {
            action.prepare()?;
        }
        for action in &self.actions {
            on_action(action);
            action.execute()?;
        }
        Ok(())
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Plan:")?;
        for action in &self.actions {
            write!(f, "\n  {action}")?;
        }
        Ok(())
    }
}
