//! Application configuration
//!
//! Settings come from `awslog.toml` in the platform config directory (or an
//! explicit path) and are then overridden by command-line flags. The resolved
//! value is handed to constructors; nothing here is global.
//!
//! ```toml
//! log_group = "/aws/lambda/my-function"
//! region = "eu-west-1"
//! color = true
//!
//! [tail]
//! interval_ms = 1000
//! channel_capacity = 64
//!
//! [insight]
//! poll_interval_ms = 150
//! max_polls = 2000
//! ```

#![warn(clippy::all, rust_2018_idioms)]

use anyhow::{bail, Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::data_plane::cloudwatch_logs::types::{
    InsightOptions, TailOptions, DEFAULT_QUERY_POLL_INTERVAL, DEFAULT_TAIL_CHANNEL_CAPACITY,
    DEFAULT_TAIL_INTERVAL,
};

const CONFIG_FILE_NAME: &str = "awslog.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Log group every command works against
    pub log_group: Option<String>,
    /// AWS region, falls back to the SDK default chain
    pub region: Option<String>,
    /// Named profile from the shared AWS config
    pub profile: Option<String>,
    /// Pretty-print JSON messages with colors
    pub color: bool,
    pub tail: TailSettings,
    pub insight: InsightSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TailSettings {
    pub interval_ms: u64,
    pub channel_capacity: usize,
}

impl Default for TailSettings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_TAIL_INTERVAL.as_millis() as u64,
            channel_capacity: DEFAULT_TAIL_CHANNEL_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightSettings {
    pub poll_interval_ms: u64,
    /// Unset means poll until the query settles
    pub max_polls: Option<u32>,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: DEFAULT_QUERY_POLL_INTERVAL.as_millis() as u64,
            max_polls: None,
        }
    }
}

/// Values given on the command line, applied on top of the file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub log_group: Option<String>,
    pub region: Option<String>,
    pub profile: Option<String>,
    pub color: bool,
}

impl AppConfig {
    /// Location of the per-user configuration file
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "", "awslog").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    /// Load configuration
    ///
    /// An explicit `path` must exist. Without one the per-user file is read when
    /// present and defaults are used otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from_file(path),
            None => match Self::default_path() {
                Some(path) if path.exists() => Self::load_from_file(&path),
                _ => {
                    trace_debug!("No configuration file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Unable to read configuration file {}", path.display()))?;
        let config: AppConfig = toml::from_str(&content)
            .with_context(|| format!("Unable to parse configuration file {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("Invalid configuration file {}", path.display()))?;

        log_debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Reject values that would make the pollers spin or give up immediately
    pub fn validate(&self) -> Result<()> {
        if self.tail.interval_ms == 0 {
            bail!("[tail] interval_ms must be at least 1");
        }
        if self.tail.channel_capacity == 0 {
            bail!("[tail] channel_capacity must be at least 1");
        }
        if self.insight.poll_interval_ms == 0 {
            bail!("[insight] poll_interval_ms must be at least 1");
        }
        if self.insight.max_polls == Some(0) {
            bail!("[insight] max_polls must be at least 1 when set");
        }
        Ok(())
    }

    /// Apply command-line values on top of the file values
    pub fn with_overrides(mut self, overrides: ConfigOverrides) -> Self {
        if overrides.log_group.is_some() {
            self.log_group = overrides.log_group;
        }
        if overrides.region.is_some() {
            self.region = overrides.region;
        }
        if overrides.profile.is_some() {
            self.profile = overrides.profile;
        }
        self.color |= overrides.color;
        self
    }

    pub fn tail_options(&self) -> TailOptions {
        TailOptions::new()
            .with_interval(Duration::from_millis(self.tail.interval_ms))
            .with_channel_capacity(self.tail.channel_capacity)
    }

    pub fn insight_options(&self) -> InsightOptions {
        let options =
            InsightOptions::new().with_poll_interval(Duration::from_millis(self.insight.poll_interval_ms));

        match self.insight.max_polls {
            Some(max_polls) => options.with_max_polls(max_polls),
            None => options,
        }
    }
}
