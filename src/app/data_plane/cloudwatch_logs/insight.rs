//! Log Insights queries
//!
//! Submits a time-bounded query, polls its status until the backend reports a
//! terminal state and decodes the result rows into [`LogEvent`]s.
//!
//! Status handling:
//!
//! | status     | action                                      |
//! |------------|---------------------------------------------|
//! | `Running`  | sleep `poll_interval`, poll again           |
//! | `Complete` | decode rows in backend order                |
//! | any other  | fail with status label and statistics       |

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, NaiveDateTime, Utc};

use super::backend::LogsBackend;
use super::error::LogsError;
use super::types::{InsightOptions, LogEvent, QueryStatus, ResultField};

/// Field carrying the raw log line
pub const MESSAGE_FIELD: &str = "@message";

/// Field carrying the event time, formatted with [`TIMESTAMP_FORMAT`]
pub const TIMESTAMP_FIELD: &str = "@timestamp";

/// Insights renders `@timestamp` in UTC with millisecond precision
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Run `query` over `[from, to)` and return its rows as events
pub async fn run_query(
    backend: &dyn LogsBackend,
    query: &str,
    from: DateTime<Utc>,
    to: DateTime<Utc>,
    options: &InsightOptions,
) -> Result<Vec<LogEvent>, LogsError> {
    let handle = backend.start_query(query, from, to).await?;
    log_info!("Submitted Log Insights query {} over [{}, {})", handle, from, to);

    let mut polls = 0u32;
    let results = loop {
        let results = backend.get_query_results(&handle).await?;
        polls += 1;

        match results.status {
            QueryStatus::Running => {
                if options.max_polls.is_some_and(|max| polls >= max) {
                    log_warn!("Log Insights query {} still running after {} polls", handle, polls);
                    return Err(LogsError::QueryTimedOut {
                        query_id: handle.to_string(),
                        polls,
                    });
                }
                tokio::time::sleep(options.poll_interval).await;
            }
            QueryStatus::Complete => break results,
            status => {
                log_error!("Log Insights query {} ended with status {}", handle, status);
                return Err(LogsError::QueryFailed {
                    status,
                    statistics: results.statistics,
                });
            }
        }
    };

    log_info!(
        "Log Insights query {} complete after {} polls with {} rows",
        handle,
        polls,
        results.rows.len()
    );

    results.rows.iter().map(|row| decode_row(row)).collect()
}

/// Project one result row onto an event
///
/// A missing `@message` yields an empty message. A missing or malformed
/// `@timestamp` is an error.
pub fn decode_row(row: &[ResultField]) -> Result<LogEvent, LogsError> {
    let mut message = String::new();
    let mut timestamp = None;

    for field in row {
        match field.field.as_str() {
            MESSAGE_FIELD => message = field.value.clone(),
            TIMESTAMP_FIELD => timestamp = Some(parse_timestamp(&field.value)?),
            _ => {}
        }
    }

    let timestamp = timestamp.ok_or_else(|| LogsError::Decode {
        field: TIMESTAMP_FIELD.to_string(),
        value: String::new(),
        reason: "field is missing from the result row".to_string(),
    })?;

    Ok(LogEvent::new(timestamp, message))
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, LogsError> {
    NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|err| LogsError::Decode {
            field: TIMESTAMP_FIELD.to_string(),
            value: value.to_string(),
            reason: err.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::data_plane::cloudwatch_logs::scripted::ScriptedBackend;
    use crate::app::data_plane::cloudwatch_logs::types::{QueryResults, QueryStatistics};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn row(message: &str, timestamp: &str) -> Vec<ResultField> {
        vec![
            ResultField::new("@message", message),
            ResultField::new("@timestamp", timestamp),
        ]
    }

    fn window() -> (DateTime<Utc>, DateTime<Utc>) {
        (
            Utc.with_ymd_and_hms(2021, 1, 2, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2021, 1, 2, 6, 0, 0).unwrap(),
        )
    }

    #[test]
    fn test_decode_row() {
        let event = decode_row(&row("hello", "2021-01-02 03:04:05.678")).unwrap();

        assert_eq!(
            event,
            LogEvent::new(
                Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap()
                    + chrono::Duration::milliseconds(678),
                "hello"
            )
        );
    }

    #[test]
    fn test_decode_row_ignores_other_fields_and_order() {
        let fields = vec![
            ResultField::new("@timestamp", "2021-01-02 03:04:05.000"),
            ResultField::new("@logStream", "stream-1"),
            ResultField::new("@message", "late message"),
        ];

        let event = decode_row(&fields).unwrap();
        assert_eq!(event.message, "late message");
    }

    #[test]
    fn test_decode_row_without_message() {
        let fields = vec![ResultField::new("@timestamp", "2021-01-02 03:04:05.000")];

        assert_eq!(decode_row(&fields).unwrap().message, "");
    }

    #[test]
    fn test_decode_row_rejects_bad_or_missing_timestamp() {
        assert!(matches!(
            decode_row(&row("hello", "2021-01-02T03:04:05Z")),
            Err(LogsError::Decode { .. })
        ));
        assert!(matches!(
            decode_row(&[ResultField::new("@message", "hello")]),
            Err(LogsError::Decode { .. })
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_polls_until_complete() {
        let backend = ScriptedBackend::new();
        backend.push_results(QueryResults::running());
        backend.push_results(QueryResults::running());
        backend.push_results(QueryResults::complete(vec![
            row("first", "2021-01-02 03:04:05.000"),
            row("second", "2021-01-02 03:04:04.000"),
        ]));
        let (from, to) = window();

        let started = tokio::time::Instant::now();
        let events = run_query(&backend, "fields @message", from, to, &InsightOptions::new())
            .await
            .unwrap();
        let waited = started.elapsed();

        assert_eq!(backend.result_polls(), 3);
        assert!(waited >= Duration::from_millis(300));
        assert!(waited < Duration::from_millis(450));

        // backend order is kept, no re-sorting
        let messages: Vec<_> = events.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second"]);

        let submitted = backend.submitted_queries();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].query, "fields @message");
        assert_eq!(submitted[0].from, from);
        assert_eq!(submitted[0].to, to);
    }

    #[tokio::test(start_paused = true)]
    async fn test_terminal_failure_carries_status_and_statistics() {
        let backend = ScriptedBackend::new();
        backend.push_results(QueryResults::running());
        // Rows on a failed poll are never decoded, so a bad timestamp must not surface
        backend.push_results(QueryResults {
            status: QueryStatus::Failed,
            rows: vec![row("partial", "yesterday")],
            statistics: Some(QueryStatistics::new(42.0, 0.0, 7.0)),
        });
        let (from, to) = window();

        let err = run_query(&backend, "fields @message", from, to, &InsightOptions::new())
            .await
            .unwrap_err();

        match err {
            LogsError::QueryFailed { status, statistics } => {
                assert_eq!(status, QueryStatus::Failed);
                assert_eq!(statistics, Some(QueryStatistics::new(42.0, 0.0, 7.0)));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(backend.result_polls(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_running_repolls() {
        for status in [
            QueryStatus::Scheduled,
            QueryStatus::Cancelled,
            QueryStatus::Timeout,
            QueryStatus::Unknown,
        ] {
            let backend = ScriptedBackend::new();
            backend.push_results(QueryResults::with_status(status.clone()));
            let (from, to) = window();

            let result = run_query(&backend, "q", from, to, &InsightOptions::new()).await;

            assert!(matches!(result, Err(LogsError::QueryFailed { .. })));
            assert_eq!(backend.result_polls(), 1, "status {status}");
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_bad_row_aborts_whole_query() {
        let backend = ScriptedBackend::new();
        backend.push_results(QueryResults::complete(vec![
            row("ok", "2021-01-02 03:04:05.000"),
            row("broken", "yesterday"),
        ]));
        let (from, to) = window();

        let result = run_query(&backend, "q", from, to, &InsightOptions::new()).await;

        assert!(matches!(result, Err(LogsError::Decode { .. })));
    }

    #[tokio::test]
    async fn test_submission_and_poll_errors_are_not_retried() {
        let (from, to) = window();

        let backend = ScriptedBackend::new();
        backend.fail_start_query("no such log group");
        let result = run_query(&backend, "q", from, to, &InsightOptions::new()).await;
        assert!(matches!(result, Err(LogsError::BackendUnavailable { .. })));
        assert_eq!(backend.result_polls(), 0);

        let backend = ScriptedBackend::new();
        backend.push_results_error("throttled");
        let result = run_query(&backend, "q", from, to, &InsightOptions::new()).await;
        assert!(matches!(result, Err(LogsError::BackendUnavailable { .. })));
        assert_eq!(backend.result_polls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_max_polls_bounds_a_stuck_query() {
        let backend = ScriptedBackend::new();
        backend.repeat_results(QueryResults::running());
        let (from, to) = window();

        let result = run_query(
            &backend,
            "q",
            from,
            to,
            &InsightOptions::new().with_max_polls(5),
        )
        .await;

        assert!(matches!(
            result,
            Err(LogsError::QueryTimedOut { polls: 5, .. })
        ));
        assert_eq!(backend.result_polls(), 5);
    }
}
