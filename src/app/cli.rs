//! Command-line definition

#![warn(clippy::all, rust_2018_idioms)]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::config::ConfigOverrides;

/// awslog - command line interface to AWS CloudWatch Logs
#[derive(Debug, Parser)]
#[command(name = "awslog")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// AWS CloudWatch LogGroup (e.g. /aws/lambda/myfun)
    #[arg(short = 'g', long, global = true, env = "AWSLOG_LOG_GROUP")]
    pub log_group: Option<String>,

    /// Enable colored output
    #[arg(short, long, global = true)]
    pub color: bool,

    /// AWS region (defaults to the SDK configuration chain)
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// Named AWS profile
    #[arg(long, global = true)]
    pub profile: Option<String>,

    /// Path to a configuration file (defaults to the per-user awslog.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Mirror diagnostics to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Stream AWS CloudWatch Log events to console
    ///
    /// Supports filtering messages using filter pattern:
    /// https://docs.aws.amazon.com/AmazonCloudWatch/latest/logs/FilterAndPatternSyntax.html
    Stream {
        /// AWS CloudWatch Logs filter pattern
        #[arg(short, long, default_value = "")]
        query: String,
    },
    /// Execute AWS CloudWatch Log Insights query
    Latest {
        /// Path to AWS CloudWatch Log Insights query
        #[arg(short, long)]
        query: PathBuf,
        /// Time interval either in seconds (s), minutes (m), hours (h) or days (d)
        #[arg(short, long, default_value = "10m")]
        time: String,
    },
    /// Print events of the recent past once and exit
    Events {
        /// AWS CloudWatch Logs filter pattern
        #[arg(short, long, default_value = "")]
        query: String,
        /// Time interval either in seconds (s), minutes (m), hours (h) or days (d)
        #[arg(short, long, default_value = "10m")]
        time: String,
    },
}

impl Cli {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            log_group: self.log_group.clone(),
            region: self.region.clone(),
            profile: self.profile.clone(),
            color: self.color,
        }
    }
}
