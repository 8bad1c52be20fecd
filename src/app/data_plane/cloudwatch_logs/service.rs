//! Log service facade
//!
//! Bundles one backend with the polling options so callers get the three
//! retrieval operations behind a single handle.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::backend::LogsBackend;
use super::error::LogsError;
use super::fetch::fetch_events;
use super::insight::run_query;
use super::tail::{tail_events, LogTail};
use super::types::{InsightOptions, LogEvent, TailOptions};

#[derive(Clone)]
pub struct LogService {
    backend: Arc<dyn LogsBackend>,
    tail_options: TailOptions,
    insight_options: InsightOptions,
}

impl LogService {
    /// Create a service with default polling options
    pub fn new(backend: Arc<dyn LogsBackend>) -> Self {
        Self {
            backend,
            tail_options: TailOptions::default(),
            insight_options: InsightOptions::default(),
        }
    }

    pub fn with_tail_options(mut self, options: TailOptions) -> Self {
        self.tail_options = options;
        self
    }

    pub fn with_insight_options(mut self, options: InsightOptions) -> Self {
        self.insight_options = options;
        self
    }

    /// All events matching `filter` at or after `from`, across every page
    pub async fn events(
        &self,
        filter: &str,
        from: DateTime<Utc>,
    ) -> Result<Vec<LogEvent>, LogsError> {
        fetch_events(self.backend.as_ref(), filter, from).await
    }

    /// Live tail of events matching `filter` from now on
    pub fn stream(&self, filter: &str, cancel: CancellationToken) -> LogTail {
        self.stream_from(filter, Utc::now(), cancel)
    }

    /// Live tail of events matching `filter` with the watermark starting at `from`
    pub fn stream_from(
        &self,
        filter: &str,
        from: DateTime<Utc>,
        cancel: CancellationToken,
    ) -> LogTail {
        tail_events(
            self.backend.clone(),
            filter,
            from,
            self.tail_options.clone(),
            cancel,
        )
    }

    /// Run a Log Insights query over `[from, to)`
    pub async fn query(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<LogEvent>, LogsError> {
        run_query(self.backend.as_ref(), query, from, to, &self.insight_options).await
    }
}
