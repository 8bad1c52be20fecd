#[cfg(test)]
mod tests {
    use awslog::app::data_plane::cloudwatch_logs::{
        FilterPage, InsightOptions, LogEvent, LogService, LogsError, QueryResults, ResultField,
        ScriptedBackend, TailOptions,
    };
    use chrono::{DateTime, TimeZone, Utc};
    use futures::StreamExt;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio_util::sync::CancellationToken;

    fn at(ms: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 1, 2, 3, 0, 0).unwrap() + chrono::Duration::milliseconds(ms)
    }

    fn service(backend: &Arc<ScriptedBackend>) -> LogService {
        LogService::new(backend.clone())
    }

    #[tokio::test]
    async fn test_events_reads_every_page() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(FilterPage::with_next(vec![LogEvent::new(at(1), "a")], "p2"));
        backend.push_page(FilterPage::with_next(vec![LogEvent::new(at(2), "b")], "p3"));
        backend.push_page(FilterPage::last(vec![LogEvent::new(at(3), "c")]));

        let events = service(&backend).events("ERROR", at(0)).await.unwrap();

        assert_eq!(
            events,
            vec![
                LogEvent::new(at(1), "a"),
                LogEvent::new(at(2), "b"),
                LogEvent::new(at(3), "c"),
            ]
        );
        assert_eq!(backend.filter_calls(), 3);
    }

    #[tokio::test]
    async fn test_events_failure_on_page_two_of_three() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(FilterPage::with_next(vec![LogEvent::new(at(1), "a")], "p2"));
        backend.push_filter_error("service unavailable");
        backend.push_page(FilterPage::last(vec![LogEvent::new(at(3), "c")]));

        let result = service(&backend).events("", at(0)).await;

        assert!(matches!(result, Err(LogsError::BackendUnavailable { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tail_delivers_each_event_once_across_ticks() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(FilterPage::last(vec![
            LogEvent::new(at(1), "first"),
            LogEvent::new(at(5), "second"),
        ]));
        backend.push_page(FilterPage::last(vec![LogEvent::new(at(10), "third")]));

        let cancel = CancellationToken::new();
        let tail = service(&backend).stream_from("", at(0), cancel.clone());

        let received: Vec<_> = tail
            .take(3)
            .map(|item| item.unwrap())
            .collect()
            .await;
        cancel.cancel();

        assert_eq!(
            received,
            vec![
                LogEvent::new(at(1), "first"),
                LogEvent::new(at(5), "second"),
                LogEvent::new(at(10), "third"),
            ]
        );

        let requests = backend.filter_requests();
        assert_eq!(requests[0].start_time_ms, at(0).timestamp_millis());
        assert_eq!(requests[1].start_time_ms, at(6).timestamp_millis());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tail_honours_configured_interval() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_page(FilterPage::last(vec![LogEvent::new(at(1), "only")]));

        let cancel = CancellationToken::new();
        let mut tail = service(&backend)
            .with_tail_options(TailOptions::new().with_interval(Duration::from_secs(5)))
            .stream_from("", at(0), cancel.clone());

        let started = tokio::time::Instant::now();
        assert!(tail.next_event().await.unwrap().is_ok());
        assert!(started.elapsed() >= Duration::from_secs(5));

        cancel.cancel();
        assert!(tail.next_event().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_query_decodes_rows() {
        let backend = Arc::new(ScriptedBackend::new());
        backend.push_results(QueryResults::running());
        backend.push_results(QueryResults::complete(vec![vec![
            ResultField::new("@message", "hello"),
            ResultField::new("@timestamp", "2021-01-02 03:04:05.678"),
        ]]));

        let events = service(&backend)
            .with_insight_options(InsightOptions::new())
            .query("fields @timestamp, @message", at(0), at(60_000))
            .await
            .unwrap();

        assert_eq!(
            events,
            vec![LogEvent::new(
                Utc.with_ymd_and_hms(2021, 1, 2, 3, 4, 5).unwrap()
                    + chrono::Duration::milliseconds(678),
                "hello"
            )]
        );
    }
}
