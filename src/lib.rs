//! awslog - Tail and Query AWS CloudWatch Logs
//!
//! awslog retrieves log records from a CloudWatch Logs log group, either as a live
//! stream of new events or as the result of a Log Insights query.
//!
//! # Core Features
//!
//! - **Live tail**: watermark-driven polling that turns the paginated
//!   FilterLogEvents API into an ordered, de-duplicated, backpressured stream
//! - **Log Insights**: submit a query, poll until it settles, decode the rows
//! - **Paginated fetch**: every event after a start time, across all pages
//!
//! # Architecture Overview
//!
//! - **Retrieval engine** ([`app::data_plane::cloudwatch_logs`]): backend-agnostic
//!   fetch, tail and query algorithms behind the
//!   [`LogsBackend`](app::data_plane::cloudwatch_logs::LogsBackend) seam
//! - **SDK client** ([`app::data_plane::cloudwatch_logs::client`]): the seam
//!   implemented over `aws-sdk-cloudwatchlogs`
//! - **Command line** ([`app::cli`], [`app::commands`]): argument parsing,
//!   configuration, console rendering
//!
//! All command-line options travel as an explicit [`app::AppConfig`] value; there
//! is no process-wide option state.

#![warn(clippy::all, rust_2018_idioms)]

// Include logging macros first
#[macro_use]
pub mod logging_macros;

pub mod app;
pub use app::data_plane::cloudwatch_logs::{LogEvent, LogService, LogsError};
