//! Live tail of a log group
//!
//! A background task polls the backend on a fixed cadence and pushes new events
//! through a bounded, ordered channel. The task owns the watermark: every poll
//! asks for events strictly after the last one delivered.
//!
//! ```text
//!   tick ──> fetch_events(filter, watermark) ──> send(event)* ──> advance watermark
//!     ^                                                                 │
//!     └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The stream yields `Ok(event)` items. On backend failure it yields exactly one
//! `Err` and closes; on cancellation it closes without an error item.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Duration as ChronoDuration, Utc};
use futures::Stream;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::backend::LogsBackend;
use super::error::LogsError;
use super::fetch::fetch_events;
use super::types::{LogEvent, TailOptions};

/// Item delivered by a [`LogTail`]
pub type TailItem = Result<LogEvent, LogsError>;

/// Consumer side of a live tail
///
/// Dropping it stops the background task at its next suspension point.
pub struct LogTail {
    receiver: mpsc::Receiver<TailItem>,
    task: JoinHandle<()>,
}

impl LogTail {
    /// Next event, or `None` once the tail has been cancelled or has failed
    pub async fn next_event(&mut self) -> Option<TailItem> {
        self.receiver.recv().await
    }

    /// True once the background task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Stream for LogTail {
    type Item = TailItem;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.receiver.poll_recv(cx)
    }
}

/// Start tailing `filter` with the watermark initialised to `from`
///
/// Must be called inside a tokio runtime. The returned stream is infinite until
/// `cancel` fires, the backend fails, or the consumer drops it.
pub fn tail_events(
    backend: Arc<dyn LogsBackend>,
    filter: impl Into<String>,
    from: DateTime<Utc>,
    options: TailOptions,
    cancel: CancellationToken,
) -> LogTail {
    let (sender, receiver) = mpsc::channel(options.channel_capacity.max(1));
    let filter = filter.into();

    log_debug!(
        "Starting live tail with filter '{}' from {} every {:?}",
        filter,
        from,
        options.interval
    );

    let task = tokio::spawn(run_tail(backend, filter, from, options, cancel, sender));

    LogTail { receiver, task }
}

async fn run_tail(
    backend: Arc<dyn LogsBackend>,
    filter: String,
    from: DateTime<Utc>,
    options: TailOptions,
    cancel: CancellationToken,
    sender: mpsc::Sender<TailItem>,
) {
    let mut watermark = from;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log_debug!("Live tail cancelled at watermark {}", watermark);
                return;
            }
            _ = sender.closed() => {
                log_debug!("Live tail consumer went away at watermark {}", watermark);
                return;
            }
            _ = tokio::time::sleep(options.interval) => {}
        }

        let events = match fetch_events(backend.as_ref(), &filter, watermark).await {
            Ok(events) => events,
            Err(err) => {
                log_warn!("Live tail stopped by backend failure: {}", err);
                let _ = sender.send(Err(err)).await;
                return;
            }
        };

        let newest = events.iter().map(|event| event.timestamp).max();

        trace_debug!(
            "Live tail poll from {} returned {} events",
            watermark,
            events.len()
        );

        for event in events {
            if sender.send(Ok(event)).await.is_err() {
                log_debug!("Live tail consumer went away during delivery");
                return;
            }
        }

        if let Some(newest) = newest {
            watermark = advance_watermark(watermark, newest);
        }
    }
}

/// Next poll start after a batch whose newest event is at `newest`
///
/// Backend timestamps have millisecond resolution, so one millisecond past the
/// newest event excludes it from the next poll. Never moves backwards.
pub fn advance_watermark(watermark: DateTime<Utc>, newest: DateTime<Utc>) -> DateTime<Utc> {
    watermark.max(newest + ChronoDuration::milliseconds(1))
}
