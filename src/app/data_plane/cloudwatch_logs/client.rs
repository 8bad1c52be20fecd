//! CloudWatch Logs Client Wrapper
//!
//! Implements [`LogsBackend`] on top of the AWS SDK for one log group.

#![warn(clippy::all, rust_2018_idioms)]

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cloudwatchlogs as cloudwatchlogs;
use aws_sdk_cloudwatchlogs::error::DisplayErrorContext;
use aws_types::region::Region;
use chrono::{DateTime, Utc};

use super::backend::LogsBackend;
use super::error::LogsError;
use super::types::{
    FilterPage, FilterRequest, LogEvent, QueryHandle, QueryResults, QueryStatistics, QueryStatus,
    ResultField,
};

/// CloudWatch Logs client wrapper bound to a single log group
#[derive(Clone, Debug)]
pub struct CloudWatchLogsClient {
    client: cloudwatchlogs::Client,
    log_group_name: String,
}

impl CloudWatchLogsClient {
    /// Wrap an already configured SDK client
    pub fn new(client: cloudwatchlogs::Client, log_group_name: impl Into<String>) -> Self {
        Self {
            client,
            log_group_name: log_group_name.into(),
        }
    }

    /// Build a client from the default credential chain
    ///
    /// `region` and `profile` override what the environment and shared config provide.
    pub async fn from_default_chain(
        log_group_name: impl Into<String>,
        region: Option<String>,
        profile: Option<String>,
    ) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = region {
            loader = loader.region(Region::new(region));
        }

        if let Some(profile) = profile {
            loader = loader.profile_name(profile);
        }

        let aws_config = loader.load().await;
        let log_group_name = log_group_name.into();

        log_debug!(
            "Created CloudWatch Logs client for log group {} in region {:?}",
            log_group_name,
            aws_config.region()
        );

        Self::new(cloudwatchlogs::Client::new(&aws_config), log_group_name)
    }

    pub fn log_group_name(&self) -> &str {
        &self.log_group_name
    }
}

#[async_trait]
impl LogsBackend for CloudWatchLogsClient {
    async fn filter_events(&self, request: FilterRequest) -> Result<FilterPage, LogsError> {
        let pattern = Some(request.pattern).filter(|pattern| !pattern.is_empty());

        let response = self
            .client
            .filter_log_events()
            .log_group_name(&self.log_group_name)
            .start_time(request.start_time_ms)
            .set_filter_pattern(pattern)
            .set_next_token(request.next_token)
            .send()
            .await
            .map_err(|err| {
                LogsError::backend("FilterLogEvents", DisplayErrorContext(&err).to_string())
            })?;

        let events = response
            .events()
            .iter()
            .map(|event| {
                LogEvent::from_millis(
                    event.timestamp().unwrap_or(0),
                    event.message().unwrap_or_default(),
                )
            })
            .collect();

        Ok(FilterPage {
            events,
            next_token: response.next_token().map(|token| token.to_string()),
        })
    }

    async fn start_query(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<QueryHandle, LogsError> {
        let response = self
            .client
            .start_query()
            .log_group_name(&self.log_group_name)
            .query_string(query)
            .start_time(from.timestamp())
            .end_time(to.timestamp())
            .send()
            .await
            .map_err(|err| LogsError::backend("StartQuery", DisplayErrorContext(&err).to_string()))?;

        response
            .query_id()
            .map(QueryHandle::new)
            .ok_or_else(|| LogsError::backend("StartQuery", "response carries no query id"))
    }

    async fn get_query_results(&self, handle: &QueryHandle) -> Result<QueryResults, LogsError> {
        let response = self
            .client
            .get_query_results()
            .query_id(handle.as_str())
            .send()
            .await
            .map_err(|err| {
                LogsError::backend("GetQueryResults", DisplayErrorContext(&err).to_string())
            })?;

        let status = response
            .status()
            .map(|status| QueryStatus::from_label(status.as_str()))
            .unwrap_or(QueryStatus::Unknown);

        let rows = response
            .results()
            .iter()
            .map(|row| {
                row.iter()
                    .map(|field| {
                        ResultField::new(
                            field.field().unwrap_or_default(),
                            field.value().unwrap_or_default(),
                        )
                    })
                    .collect()
            })
            .collect();

        let statistics = response.statistics().map(|stats| {
            QueryStatistics::new(
                stats.bytes_scanned(),
                stats.records_matched(),
                stats.records_scanned(),
            )
        });

        Ok(QueryResults {
            status,
            rows,
            statistics,
        })
    }
}
