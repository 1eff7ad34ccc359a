//! Deployment target descriptor: `[[user@]host:]path`.
use std::fmt;
use std::path::PathBuf;

/// Where dotfiles are deployed to.
///
/// A target is remote iff `host` is set.
///
/// # Examples
///
/// ```
/// use dotlink::target::Target;
///
/// let local = Target::parse("/home/amy");
/// assert!(!local.is_remote());
///
/// let remote = Target::parse("amy@devbox:/home/amy");
/// assert_eq!(remote.address(), "amy@devbox");
/// assert_eq!(remote.to_string(), "amy@devbox:/home/amy");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Destination directory (local, or on the remote host).
    pub path: PathBuf,
    /// SSH host, for remote targets.
    pub host: Option<String>,
    /// SSH user, for remote targets.
    pub user: Option<String>,
}

impl Target {
    /// A local target directory.
    #[must_use]
    pub fn local(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            host: None,
            user: None,
        }
    }

    /// Parse a `[[user@]host:]path` descriptor.
    ///
    /// Anything without a non-empty `host:` prefix is a local path.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        let Some((address, path)) = value.split_once(':') else {
            return Self::local(value);
        };
        let (user, host) = match address.split_once('@') {
            Some((user, host)) if !user.is_empty() => (Some(user), host),
            _ => (None, address),
        };
        if host.is_empty() {
            return Self::local(value);
        }
        Self {
            path: PathBuf::from(path),
            host: Some(host.to_string()),
            user: user.map(String::from),
        }
    }

    /// Whether deployment must go over SSH.
    #[must_use]
    pub const fn is_remote(&self) -> bool {
        self.host.is_some()
    }

    /// SSH address: `user@host`, `host`, or empty for local targets.
    #[must_use]
    pub fn address(&self) -> String {
        match (&self.user, &self.host) {
            (Some(user), Some(host)) => format!("{user}@{host}"),
            (None, Some(host)) => host.clone(),
            _ => String::new(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_remote() {
            write!(f, "{}:{}", self.address(), self.path.display())
        } else {
            write!(f, "{}", self.path.display())
        }
    }
}
