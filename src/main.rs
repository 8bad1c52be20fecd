#![warn(clippy::all, rust_2018_idioms)]

use clap::Parser;
use std::fs::File;
use std::path::PathBuf;
use tracing_subscriber::prelude::*;

use awslog::app::{commands, user_facing_error, Cli};

const DEFAULT_LOG_FILTER: &str =
    "awslog=info,aws_config=warn,aws_sigv4=warn,aws_smithy_runtime=warn,aws_smithy_runtime_api=warn,hyper=warn";

/// Open the append-only diagnostics file under the per-user data directory
fn open_log_file() -> Option<(File, PathBuf)> {
    let proj_dirs = directories::ProjectDirs::from("com", "", "awslog")?;
    let log_dir = proj_dirs.data_dir().join("logs");
    let _ = std::fs::create_dir_all(&log_dir);

    let log_path = log_dir.join("awslog.log");
    let file = match std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Unable to open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    // Owner read/write only
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Ok(metadata) = file.metadata() {
            let mut perms = metadata.permissions();
            perms.set_mode(0o600);
            if let Err(e) = std::fs::set_permissions(&log_path, perms) {
                eprintln!("Failed to set log file permissions: {}", e);
            }
        }
    }

    Some((file, log_path))
}

/// Diagnostics go to a file so they never interleave with events on stdout.
/// `verbose` mirrors them to stderr as well.
fn init_logging(verbose: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER));

    let log_file = open_log_file();
    let log_path = log_file.as_ref().map(|(_, path)| path.clone());

    let file_layer = log_file.map(|(file, _)| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
    });

    let stderr_layer = verbose.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(false)
    });

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(file_layer)
        .with(stderr_layer);

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return;
    }

    // Bridge log crate events to tracing (aws-config and friends still use log)
    if let Err(e) = tracing_log::LogTracer::init() {
        eprintln!("Failed to initialize log-to-tracing bridge: {}", e);
    }

    tracing::debug!("Logging initialized to: {:?}", log_path);
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    tracing::info!("awslog starting: {:?}", cli.command);

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Unable to start async runtime: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(err) = runtime.block_on(commands::run(cli)) {
        tracing::error!("awslog failed: {:#}", err);
        eprintln!("{}", user_facing_error(&err));
        std::process::exit(1);
    }
}
