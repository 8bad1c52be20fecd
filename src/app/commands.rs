//! Command execution
//!
//! Resolves configuration, connects to CloudWatch Logs and prints events.

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{Context, Result};
use chrono::Utc;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::cli::{Cli, Command};
use super::config::AppConfig;
use super::data_plane::cloudwatch_logs::{CloudWatchLogsClient, LogEvent, LogService};
use super::interval::{parse_interval, window_start};
use super::output::write_event;

/// Run the parsed command line to completion
pub async fn run(cli: Cli) -> Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(cli.overrides());

    match cli.command {
        Command::Stream { query } => stream(&config, &query).await,
        Command::Latest { query, time } => latest(&config, &query, &time).await,
        Command::Events { query, time } => events(&config, &query, &time).await,
    }
}

fn require_log_group(config: &AppConfig) -> Result<String> {
    config.log_group.clone().context(
        "undefined AWS CloudWatch Log Group identified, use --log-group flag to specify one",
    )
}

async fn connect(config: &AppConfig, log_group: String) -> LogService {
    let client = CloudWatchLogsClient::from_default_chain(
        log_group,
        config.region.clone(),
        config.profile.clone(),
    )
    .await;

    LogService::new(Arc::new(client))
        .with_tail_options(config.tail_options())
        .with_insight_options(config.insight_options())
}

async fn stream(config: &AppConfig, filter: &str) -> Result<()> {
    let log_group = require_log_group(config)?;
    let service = connect(config, log_group).await;

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log_info!("Interrupted, stopping live tail");
            on_interrupt.cancel();
        }
    });

    let mut tail = service.stream(filter, cancel);
    let stdout = std::io::stdout();

    while let Some(item) = tail.next_event().await {
        let event = item.context("Live tail stopped")?;
        write_event(&mut stdout.lock(), &event, config.color)?;
    }

    Ok(())
}

async fn latest(config: &AppConfig, query_file: &Path, time: &str) -> Result<()> {
    let log_group = require_log_group(config)?;
    let query = std::fs::read_to_string(query_file)
        .with_context(|| format!("Unable to read query file {}", query_file.display()))?;
    let interval = parse_interval(time).context("Unable to parse time interval")?;

    let to = Utc::now();
    let from = window_start(to, interval)?;

    let service = connect(config, log_group).await;
    let found = service
        .query(&query, from, to)
        .await
        .context("Unable to run AWS CloudWatch Log Insights query")?;

    print_events(&found, config.color)
}

async fn events(config: &AppConfig, filter: &str, time: &str) -> Result<()> {
    let log_group = require_log_group(config)?;
    let interval = parse_interval(time).context("Unable to parse time interval")?;
    let from = window_start(Utc::now(), interval)?;

    let service = connect(config, log_group).await;
    let found = service
        .events(filter, from)
        .await
        .context("Unable to fetch AWS CloudWatch Log events")?;

    print_events(&found, config.color)
}

fn print_events(events: &[LogEvent], color: bool) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    for event in events {
        write_event(&mut out, event, color)?;
    }

    out.flush()?;
    Ok(())
}
