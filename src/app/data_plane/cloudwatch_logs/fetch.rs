//! Paginated event fetch
//!
//! Follows continuation tokens until the backend reports no further page and
//! returns every event of the window in the order received.

#![warn(clippy::all, rust_2018_idioms)]

use chrono::{DateTime, Utc};

use super::backend::LogsBackend;
use super::error::LogsError;
use super::types::{FilterRequest, LogEvent};

/// Fetch all events matching `filter` at or after `from`
///
/// There is no page limit. An error on any page aborts the call and the events
/// gathered so far are dropped.
pub async fn fetch_events(
    backend: &dyn LogsBackend,
    filter: &str,
    from: DateTime<Utc>,
) -> Result<Vec<LogEvent>, LogsError> {
    let mut events = Vec::new();
    let mut request = FilterRequest::new(filter, from);
    let mut pages = 0usize;

    loop {
        let page = backend.filter_events(request.clone()).await?;
        pages += 1;

        trace_debug!(
            "Fetched page {} with {} events (more: {})",
            pages,
            page.events.len(),
            page.next_token.is_some()
        );

        events.extend(page.events);

        match page.next_token {
            Some(token) => request = request.with_next_token(token),
            None => return Ok(events),
        }
    }
}
