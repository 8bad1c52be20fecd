//! CloudWatch Logs Data Types
//!
//! Data structures exchanged between the log retrieval engine and the backend.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default cadence of the live tail loop
pub const DEFAULT_TAIL_INTERVAL: Duration = Duration::from_secs(1);

/// Default capacity of the ordered delivery queue between the tail task and its consumer
pub const DEFAULT_TAIL_CHANNEL_CAPACITY: usize = 64;

/// Default sleep between two status polls of a running Insights query
pub const DEFAULT_QUERY_POLL_INTERVAL: Duration = Duration::from_millis(150);

/// Lower bound for any poll interval, a zero interval would spin on the backend
const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// A single log event
///
/// Immutable value. Two events are equal when both timestamp and message match;
/// duplicates across page boundaries are kept as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEvent {
    /// Event timestamp
    pub timestamp: DateTime<Utc>,
    /// Log message content
    pub message: String,
}

impl LogEvent {
    /// Create a new log event
    pub fn new(timestamp: DateTime<Utc>, message: impl Into<String>) -> Self {
        Self {
            timestamp,
            message: message.into(),
        }
    }

    /// Create a log event from a Unix millisecond timestamp
    ///
    /// Out-of-range timestamps collapse to the Unix epoch.
    pub fn from_millis(timestamp_ms: i64, message: impl Into<String>) -> Self {
        let timestamp = DateTime::from_timestamp_millis(timestamp_ms).unwrap_or_default();
        Self::new(timestamp, message)
    }
}

/// One page request of the filter-events operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterRequest {
    /// Filter pattern (CloudWatch Logs filter syntax, empty matches everything)
    pub pattern: String,
    /// Start time (Unix timestamp in milliseconds, inclusive)
    pub start_time_ms: i64,
    /// Continuation token from the previous page
    pub next_token: Option<String>,
}

impl FilterRequest {
    /// First page request for a pattern and start instant
    pub fn new(pattern: impl Into<String>, from: DateTime<Utc>) -> Self {
        Self {
            pattern: pattern.into(),
            start_time_ms: from.timestamp_millis(),
            next_token: None,
        }
    }

    /// Same request pointed at the page behind `token`
    pub fn with_next_token(mut self, token: String) -> Self {
        self.next_token = Some(token);
        self
    }
}

/// One page of filtered events
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterPage {
    /// Events in the order the backend returned them
    pub events: Vec<LogEvent>,
    /// Token for pagination (if more results available)
    pub next_token: Option<String>,
}

impl FilterPage {
    /// A final page carrying no continuation token
    pub fn last(events: Vec<LogEvent>) -> Self {
        Self {
            events,
            next_token: None,
        }
    }

    /// A page that points at a further page
    pub fn with_next(events: Vec<LogEvent>, token: impl Into<String>) -> Self {
        Self {
            events,
            next_token: Some(token.into()),
        }
    }
}

/// Opaque identifier of a submitted Insights query
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryHandle(String);

impl QueryHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueryHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Status of an Insights query as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryStatus {
    Scheduled,
    Running,
    Complete,
    Failed,
    Cancelled,
    Timeout,
    Unknown,
    /// A status label this client does not know about
    Other(String),
}

impl QueryStatus {
    /// Parse the backend's status label
    pub fn from_label(label: &str) -> Self {
        match label {
            "Scheduled" => Self::Scheduled,
            "Running" => Self::Running,
            "Complete" => Self::Complete,
            "Failed" => Self::Failed,
            "Cancelled" => Self::Cancelled,
            "Timeout" => Self::Timeout,
            "Unknown" => Self::Unknown,
            other => Self::Other(other.to_string()),
        }
    }

    /// The backend's status label
    pub fn as_str(&self) -> &str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Running => "Running",
            Self::Complete => "Complete",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
            Self::Timeout => "Timeout",
            Self::Unknown => "Unknown",
            Self::Other(label) => label,
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One named field of an Insights result row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultField {
    pub field: String,
    pub value: String,
}

impl ResultField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

/// Snapshot returned by one status poll of an Insights query
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResults {
    pub status: QueryStatus,
    /// Result rows, only meaningful once the status is `Complete`
    pub rows: Vec<Vec<ResultField>>,
    pub statistics: Option<QueryStatistics>,
}

impl QueryResults {
    /// A poll that reports the query as still running
    pub fn running() -> Self {
        Self::with_status(QueryStatus::Running)
    }

    /// A poll with the given status and no rows
    pub fn with_status(status: QueryStatus) -> Self {
        Self {
            status,
            rows: Vec::new(),
            statistics: None,
        }
    }

    /// A completed poll carrying rows
    pub fn complete(rows: Vec<Vec<ResultField>>) -> Self {
        Self {
            status: QueryStatus::Complete,
            rows,
            statistics: None,
        }
    }

    /// Attach query statistics
    pub fn with_statistics(mut self, statistics: QueryStatistics) -> Self {
        self.statistics = Some(statistics);
        self
    }
}

/// Statistics about a CloudWatch Logs query
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QueryStatistics {
    /// Bytes scanned during the query
    pub bytes_scanned: f64,
    /// Number of records that matched the filter
    pub records_matched: f64,
    /// Total number of records scanned
    pub records_scanned: f64,
}

impl QueryStatistics {
    /// Create new query statistics
    pub fn new(bytes_scanned: f64, records_matched: f64, records_scanned: f64) -> Self {
        Self {
            bytes_scanned,
            records_matched,
            records_scanned,
        }
    }
}

impl fmt::Display for QueryStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{BytesScanned: {}, RecordsMatched: {}, RecordsScanned: {}}}",
            self.bytes_scanned, self.records_matched, self.records_scanned
        )
    }
}

/// Options for the live tail loop
#[derive(Debug, Clone)]
pub struct TailOptions {
    /// Time between two polls
    pub interval: Duration,
    /// Capacity of the ordered delivery queue (at least 1)
    pub channel_capacity: usize,
}

impl TailOptions {
    pub fn new() -> Self {
        Self {
            interval: DEFAULT_TAIL_INTERVAL,
            channel_capacity: DEFAULT_TAIL_CHANNEL_CAPACITY,
        }
    }

    /// Set poll interval (at least one millisecond)
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Set delivery queue capacity
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity.max(1);
        self
    }
}

impl Default for TailOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for Insights query polling
#[derive(Debug, Clone)]
pub struct InsightOptions {
    /// Sleep between two status polls while the query is running
    pub poll_interval: Duration,
    /// Give up after this many polls (None = poll until a terminal status)
    pub max_polls: Option<u32>,
}

impl InsightOptions {
    pub fn new() -> Self {
        Self {
            poll_interval: DEFAULT_QUERY_POLL_INTERVAL,
            max_polls: None,
        }
    }

    /// Set poll interval (at least one millisecond)
    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval.max(MIN_POLL_INTERVAL);
        self
    }

    /// Cap the number of status polls (at least one)
    pub fn with_max_polls(mut self, max_polls: u32) -> Self {
        self.max_polls = Some(max_polls.max(1));
        self
    }
}

impl Default for InsightOptions {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_log_event_from_millis() {
        let event = LogEvent::from_millis(1_609_556_645_678, "hello");

        assert_eq!(
            event.timestamp,
            Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap()
                + chrono::Duration::milliseconds(678)
        );
        assert_eq!(event.message, "hello");
    }

    #[test]
    fn test_filter_request_carries_pattern_and_start() {
        let from = Utc.with_ymd_and_hms(2021, 1, 1, 0, 0, 0).unwrap();
        let request = FilterRequest::new("ERROR", from).with_next_token("abc".to_string());

        assert_eq!(request.pattern, "ERROR");
        assert_eq!(request.start_time_ms, from.timestamp_millis());
        assert_eq!(request.next_token.as_deref(), Some("abc"));
    }

    #[test]
    fn test_query_status_labels() {
        for label in [
            "Scheduled",
            "Running",
            "Complete",
            "Failed",
            "Cancelled",
            "Timeout",
            "Unknown",
        ] {
            assert_eq!(QueryStatus::from_label(label).as_str(), label);
        }

        assert_eq!(
            QueryStatus::from_label("Paused"),
            QueryStatus::Other("Paused".to_string())
        );
    }

    #[test]
    fn test_options_defaults() {
        let tail = TailOptions::default();
        assert_eq!(tail.interval, Duration::from_secs(1));
        assert_eq!(tail.channel_capacity, 64);

        let insight = InsightOptions::default();
        assert_eq!(insight.poll_interval, Duration::from_millis(150));
        assert!(insight.max_polls.is_none());
    }

    #[test]
    fn test_tail_capacity_is_never_zero() {
        let options = TailOptions::new().with_channel_capacity(0);
        assert_eq!(options.channel_capacity, 1);
    }

    #[test]
    fn test_zero_intervals_and_poll_cap_are_clamped() {
        let tail = TailOptions::new().with_interval(Duration::ZERO);
        assert_eq!(tail.interval, Duration::from_millis(1));

        let insight = InsightOptions::new()
            .with_poll_interval(Duration::ZERO)
            .with_max_polls(0);
        assert_eq!(insight.poll_interval, Duration::from_millis(1));
        assert_eq!(insight.max_polls, Some(1));
    }

    #[test]
    fn test_statistics_display() {
        let stats = QueryStatistics::new(10.0, 2.0, 5.0);
        assert_eq!(
            stats.to_string(),
            "{BytesScanned: 10, RecordsMatched: 2, RecordsScanned: 5}"
        );
    }
}
