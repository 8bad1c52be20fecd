//! Application layer: command line, configuration, console output and the
//! CloudWatch Logs data plane.

#![warn(clippy::all, rust_2018_idioms)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod data_plane;
pub mod interval;
pub mod output;

pub use cli::{Cli, Command};
pub use config::AppConfig;

/// Render an error chain for the terminal, first letter upper-cased
pub fn user_facing_error(err: &anyhow::Error) -> String {
    let message = format!("{:#}", err);
    let mut chars = message.chars();

    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => message,
    }
}
