//! Remote log-query backend abstraction
//!
//! The retrieval engine only talks to CloudWatch Logs through this trait, so the
//! paging, tailing and query-polling logic can run against the SDK client or an
//! in-memory backend alike.

#![warn(clippy::all, rust_2018_idioms)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::LogsError;
use super::types::{FilterPage, FilterRequest, QueryHandle, QueryResults};

/// Operations consumed from the log-storage service, scoped to one log group
#[async_trait]
pub trait LogsBackend: Send + Sync {
    /// Fetch one page of events at or after `request.start_time_ms` matching the pattern
    async fn filter_events(&self, request: FilterRequest) -> Result<FilterPage, LogsError>;

    /// Submit an Insights query over `[from, to)`, both truncated to whole seconds
    async fn start_query(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<QueryHandle, LogsError>;

    /// Poll the status (and rows, once complete) of a submitted query
    async fn get_query_results(&self, handle: &QueryHandle) -> Result<QueryResults, LogsError>;
}
