//! Data Plane Services Module
//!
//! Data plane services read the data held inside AWS resources, as opposed to
//! control plane operations that manage the resources themselves.
//!
//! ## Available Services
//!
//! - **CloudWatch Logs**: Paginated event fetch, live tail and Log Insights queries
//!   against a single log group
//!
//! ## Architecture
//!
//! ```text
//! 1. Backend seam (LogsBackend)
//!    └─ SDK client, or the scripted in-memory backend (`test-util` feature)
//!
//! 2. Retrieval engine
//!    └─ fetch / tail / insight, backend-agnostic
//!
//! 3. Service facade (LogService)
//!    └─ what the command line talks to
//! ```

pub mod cloudwatch_logs;

pub use cloudwatch_logs::{
    CloudWatchLogsClient, LogEvent, LogService, LogsBackend, LogsError,
};
