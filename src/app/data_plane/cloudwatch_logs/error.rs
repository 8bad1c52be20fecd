//! Errors raised by the log retrieval engine

#![warn(clippy::all, rust_2018_idioms)]

use super::types::{QueryStatistics, QueryStatus};

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum LogsError {
    /// Transport, service or credential failure reported by the backend
    #[error("CloudWatch Logs {operation} failed: {source}")]
    BackendUnavailable {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    /// The Insights query reached a terminal status other than Complete
    #[error("failed to execute Log Insights query ({status}) {}", format_statistics(.statistics))]
    QueryFailed {
        status: QueryStatus,
        statistics: Option<QueryStatistics>,
    },

    /// A result row does not follow the expected shape
    #[error("unable to decode {field} '{value}': {reason}")]
    Decode {
        field: String,
        value: String,
        reason: String,
    },

    /// The query was still running after the configured number of polls
    #[error("Log Insights query {query_id} still running after {polls} polls")]
    QueryTimedOut { query_id: String, polls: u32 },
}

impl LogsError {
    pub fn backend(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::BackendUnavailable {
            operation,
            source: source.into(),
        }
    }
}

fn format_statistics(statistics: &Option<QueryStatistics>) -> String {
    statistics
        .map(|stats| stats.to_string())
        .unwrap_or_else(|| "{}".to_string())
}
