//! CloudWatch Logs Retrieval Engine
//!
//! Turns the CloudWatch Logs API into three retrieval operations.
//!
//! ## Features
//!
//! - Paginated fetch: every event after a start time, following continuation tokens
//! - Live tail: watermark-driven polling delivered as an ordered, backpressured stream
//! - Log Insights: submit a query, poll until it settles, decode rows into events
//!
//! ## Usage
//!
//! ```rust,no_run
//! use awslog::app::data_plane::cloudwatch_logs::{CloudWatchLogsClient, LogService};
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let client = CloudWatchLogsClient::from_default_chain("/aws/lambda/my-function", None, None).await;
//! let service = LogService::new(Arc::new(client));
//!
//! let mut tail = service.stream("ERROR", CancellationToken::new());
//! while let Some(Ok(event)) = tail.next_event().await {
//!     println!("{}: {}", event.timestamp, event.message);
//! }
//! # }
//! ```

#![warn(clippy::all, rust_2018_idioms)]

pub mod backend;
pub mod client;
pub mod error;
pub mod fetch;
pub mod insight;
#[cfg(any(test, feature = "test-util"))]
pub mod scripted;
pub mod service;
pub mod tail;
pub mod types;

// Re-export commonly used types
pub use backend::LogsBackend;
pub use client::CloudWatchLogsClient;
pub use error::LogsError;
pub use fetch::fetch_events;
pub use insight::{decode_row, run_query};
#[cfg(any(test, feature = "test-util"))]
pub use scripted::ScriptedBackend;
pub use service::LogService;
pub use tail::{tail_events, LogTail, TailItem};
pub use types::{
    FilterPage, FilterRequest, InsightOptions, LogEvent, QueryHandle, QueryResults,
    QueryStatistics, QueryStatus, ResultField, TailOptions,
};
