//! In-memory backend with scripted responses
//!
//! Responses are served in the order they were pushed. Every request is recorded
//! so callers can check what the engine asked for, and when.

#![warn(clippy::all, rust_2018_idioms)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::backend::LogsBackend;
use super::error::LogsError;
use super::types::{FilterPage, FilterRequest, QueryHandle, QueryResults, QueryStatus};

/// A query submission seen by the backend
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmittedQuery {
    pub query: String,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

#[derive(Default)]
struct Script {
    pages: VecDeque<Result<FilterPage, String>>,
    results: VecDeque<Result<QueryResults, String>>,
    repeat_results: Option<QueryResults>,
    start_error: Option<String>,
    filter_requests: Vec<FilterRequest>,
    submitted: Vec<SubmittedQuery>,
    result_polls: usize,
}

/// Backend serving pre-recorded pages and query statuses
///
/// Once the page queue is drained every fetch gets an empty final page. Once the
/// result queue is drained polls get the `repeat_results` snapshot if one was set,
/// otherwise an `Unknown` status.
#[derive(Default)]
pub struct ScriptedBackend {
    script: Mutex<Script>,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queue the next filter page
    pub fn push_page(&self, page: FilterPage) {
        self.script().pages.push_back(Ok(page));
    }

    /// Queue a failing filter call
    pub fn push_filter_error(&self, message: impl Into<String>) {
        self.script().pages.push_back(Err(message.into()));
    }

    /// Queue the next status poll response
    pub fn push_results(&self, results: QueryResults) {
        self.script().results.push_back(Ok(results));
    }

    /// Queue a failing status poll
    pub fn push_results_error(&self, message: impl Into<String>) {
        self.script().results.push_back(Err(message.into()));
    }

    /// Answer every poll past the queued ones with `results`
    pub fn repeat_results(&self, results: QueryResults) {
        self.script().repeat_results = Some(results);
    }

    /// Make query submission fail
    pub fn fail_start_query(&self, message: impl Into<String>) {
        self.script().start_error = Some(message.into());
    }

    /// Every filter request received so far
    pub fn filter_requests(&self) -> Vec<FilterRequest> {
        self.script().filter_requests.clone()
    }

    pub fn filter_calls(&self) -> usize {
        self.script().filter_requests.len()
    }

    /// Every query submission received so far
    pub fn submitted_queries(&self) -> Vec<SubmittedQuery> {
        self.script().submitted.clone()
    }

    pub fn result_polls(&self) -> usize {
        self.script().result_polls
    }
}

#[async_trait]
impl LogsBackend for ScriptedBackend {
    async fn filter_events(&self, request: FilterRequest) -> Result<FilterPage, LogsError> {
        let mut script = self.script();
        script.filter_requests.push(request);

        match script.pages.pop_front() {
            Some(Ok(page)) => Ok(page),
            Some(Err(message)) => Err(LogsError::backend("FilterLogEvents", message)),
            None => Ok(FilterPage::default()),
        }
    }

    async fn start_query(
        &self,
        query: &str,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<QueryHandle, LogsError> {
        let mut script = self.script();

        if let Some(message) = script.start_error.clone() {
            return Err(LogsError::backend("StartQuery", message));
        }

        script.submitted.push(SubmittedQuery {
            query: query.to_string(),
            from,
            to,
        });

        Ok(QueryHandle::new(format!("query-{}", script.submitted.len())))
    }

    async fn get_query_results(&self, _handle: &QueryHandle) -> Result<QueryResults, LogsError> {
        let mut script = self.script();
        script.result_polls += 1;

        match script.results.pop_front() {
            Some(Ok(results)) => Ok(results),
            Some(Err(message)) => Err(LogsError::backend("GetQueryResults", message)),
            None => Ok(script
                .repeat_results
                .clone()
                .unwrap_or_else(|| QueryResults::with_status(QueryStatus::Unknown))),
        }
    }
}
