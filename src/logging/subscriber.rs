//! Tracing subscriber setup: console formatter and initialisation.
use std::io::IsTerminal as _;

use tracing::Level;

use super::logger::{DRY_RUN_TARGET, STAGE_TARGET};

/// Extracts the `message` field from a [`tracing::Event`].
#[derive(Default)]
pub(super) struct MessageExtractor {
    pub(super) message: String,
}

impl tracing::field::Visit for MessageExtractor {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
        }
    }

    fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
        if field.name() == "message" {
            self.message = value.to_string();
        }
    }
}

/// Render one console line for an event.
fn render(level: Level, target: &str, msg: &str, ansi: bool) -> String {
    match (level, ansi) {
        (Level::ERROR, true) => format!("\x1b[31mERROR\x1b[0m {msg}"),
        (Level::ERROR, false) => format!("ERROR {msg}"),
        (Level::WARN, true) => format!("\x1b[33mWARN\x1b[0m  {msg}"),
        (Level::WARN, false) => format!("WARN  {msg}"),
        (Level::INFO, true) if target == STAGE_TARGET => {
            format!("\x1b[1;34m==>\x1b[0m \x1b[1m{msg}\x1b[0m")
        }
        (Level::INFO, false) if target == STAGE_TARGET => format!("==> {msg}"),
        (Level::INFO, true) if target == DRY_RUN_TARGET => {
            format!("  \x1b[33m[DRY RUN]\x1b[0m {msg}")
        }
        (Level::INFO, false) if target == DRY_RUN_TARGET => format!("  [DRY RUN] {msg}"),
        (Level::INFO, _) => format!("  {msg}"),
        (_, true) => format!("  \x1b[2m{msg}\x1b[0m"),
        (_, false) => format!("  {msg}"),
    }
}

/// A [`tracing_subscriber::fmt::FormatEvent`] that emits dotlink-style
/// console output.
struct DotlinkFormatter;

impl<S, N> tracing_subscriber::fmt::FormatEvent<S, N> for DotlinkFormatter
where
    S: tracing::Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>,
    N: for<'a> tracing_subscriber::fmt::FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        _ctx: &tracing_subscriber::fmt::FmtContext<'_, S, N>,
        mut writer: tracing_subscriber::fmt::format::Writer<'_>,
        event: &tracing::Event<'_>,
    ) -> std::fmt::Result {
        let metadata = event.metadata();
        let mut extractor = MessageExtractor::default();
        event.record(&mut extractor);
        let line = render(
            *metadata.level(),
            metadata.target(),
            &extractor.message,
            writer.has_ansi_escapes(),
        );
        writeln!(writer, "{line}")
    }
}

/// Initialise the global [`tracing`] subscriber.
///
/// Errors and warnings go to stderr, everything else to stdout.  `verbose`
/// lowers the console level to `DEBUG`; a `RUST_LOG` directive, when set,
/// takes precedence.  Colour is used only when stdout is a terminal and
/// `NO_COLOR` is unset.  Must be called once at program startup.
pub fn init_subscriber(verbose: bool) {
    use tracing_subscriber::fmt::writer::MakeWriterExt as _;
    use tracing_subscriber::{
        EnvFilter, Layer as _, filter::LevelFilter, fmt, layer::SubscriberExt as _,
        util::SubscriberInitExt as _,
    };

    let console_level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    let filter = EnvFilter::builder()
        .with_default_directive(console_level.into())
        .from_env_lossy();

    let ansi = std::io::stdout().is_terminal() && std::env::var_os("NO_COLOR").is_none();

    let make_writer = std::io::stderr
        .with_max_level(Level::WARN)
        .and(std::io::stdout.with_min_level(Level::INFO));

    let console_layer = fmt::layer()
        .event_format(DotlinkFormatter)
        .with_ansi(ansi)
        .with_writer(make_writer)
        .with_filter(filter);

    tracing_subscriber::registry().with(console_layer).init();
}
