#![warn(clippy::all, rust_2018_idioms)]

/// Logging macros that prefix every record with `[file:module:line]`
///
/// Records go through `tracing` only. The binary bridges the `log` facade of the
/// AWS SDK crates into the same subscriber with `LogTracer`, so each record is
/// written once.
#[macro_export]
macro_rules! log_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        tracing::info!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        tracing::warn!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[macro_export]
macro_rules! log_error {
    ($($arg:tt)*) => {
        tracing::error!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

/// Same as `log_debug!`, kept apart for per-page and per-poll detail
#[macro_export]
macro_rules! trace_debug {
    ($($arg:tt)*) => {
        tracing::debug!("[{}:{}:{}] {}", file!(), module_path!(), line!(), format!($($arg)*));
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    struct CountEvents(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for CountEvents {
        fn on_event(&self, _event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_each_macro_emits_one_record() {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(CountEvents(count.clone()));

        tracing::subscriber::with_default(subscriber, || {
            log_debug!("page {} fetched", 1);
            log_info!("query submitted");
            log_warn!("tail stopped");
            log_error!("query failed: {}", "Failed");
            trace_debug!("watermark moved");
        });

        assert_eq!(count.load(Ordering::SeqCst), 5);
    }
}

/*
Level guidelines for the retrieval engine:

DEBUG: per page and per poll detail (page sizes, watermark moves, tail start/stop)
INFO:  query submission and completion, user interrupts
WARN:  live tail ended by a backend failure, query poll cap reached
ERROR: query ended in a terminal non-Complete status

Never log message bodies at INFO or above: they are user data and already go to stdout.
*/
