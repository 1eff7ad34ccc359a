//! Logging infrastructure for structured console output.

mod logger;
mod subscriber;

pub use logger::{DRY_RUN_TARGET, Logger, STAGE_TARGET};
pub use subscriber::init_subscriber;

/// A captured tracing event.
#[cfg(test)]
#[derive(Debug, Clone)]
pub(crate) struct Captured {
    pub(crate) level: tracing::Level,
    pub(crate) target: String,
    pub(crate) message: String,
}

#[cfg(test)]
type CapturedEvents = std::sync::Arc<std::sync::Mutex<Vec<Captured>>>;

/// Collects every event into a shared list.
#[cfg(test)]
struct CaptureLayer(CapturedEvents);

#[cfg(test)]
impl<S: tracing::Subscriber> tracing_subscriber::Layer<S> for CaptureLayer {
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let mut extractor = subscriber::MessageExtractor::default();
        event.record(&mut extractor);
        if let Ok(mut events) = self.0.lock() {
            events.push(Captured {
                level: *event.metadata().level(),
                target: event.metadata().target().to_string(),
                message: extractor.message,
            });
        }
    }
}

/// Install a thread-local subscriber recording all events.
///
/// Keep the returned guard alive for the duration of the test; dropping it
/// restores the previous thread-local dispatcher.
#[cfg(test)]
pub(crate) fn capture() -> (CapturedEvents, tracing::dispatcher::DefaultGuard) {
    use tracing_subscriber::layer::SubscriberExt as _;
    let events = CapturedEvents::default();
    let subscriber = tracing_subscriber::registry().with(CaptureLayer(events.clone()));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (events, guard)
}
