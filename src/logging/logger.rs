//! Console logger.

/// Target used for stage headers.
pub const STAGE_TARGET: &str = "dotlink::stage";

/// Target used for dry-run listings.
pub const DRY_RUN_TARGET: &str = "dotlink::dry_run";

/// User-facing logger.
///
/// Every method emits a [`tracing`] event; the console layer installed by
/// [`init_subscriber`](super::init_subscriber) decides how it is rendered.
#[derive(Debug, Clone, Copy, Default)]
pub struct Logger;

impl Logger {
    /// Create a new logger.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run line.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }
}
