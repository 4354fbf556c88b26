//! Process bootstrap shared by the adapter binaries.
//!
//! Loads configuration, initializes logging, builds the tool set for the
//! adapter and runs the configured transport. Any error returned from
//! [`run`] is a startup failure; the binaries exit with status 1.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{Level, error, info};
use tracing_subscriber::{EnvFilter, fmt};

use super::config::{AdapterKind, Config, LoggingConfig};
use super::server::McpServer;
use super::transport::TransportService;
use crate::domains::tools::{ToolSet, build_tool_set};

/// How long runtime tasks may linger once the transport has returned.
///
/// The stdin reader runs on a blocking thread that only finishes when the peer
/// closes stdin, so the runtime must not wait for it.
const SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Entry point of the adapter binaries.
///
/// Builds the runtime, runs [`run`] on it and then shuts the runtime down
/// without waiting on a pending stdin read.
pub fn main(kind: AdapterKind) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let outcome = runtime.block_on(run(kind));
    runtime.shutdown_timeout(SHUTDOWN_GRACE);
    outcome
}

/// Run the adapter process for `kind` until EOF or a termination signal.
pub async fn run(kind: AdapterKind) -> Result<()> {
    let config = Config::from_env(kind);

    init_logging(&config.logging);

    info!("Starting {} v{}", config.server.name, config.server.version);

    let tools: Arc<dyn ToolSet> = build_tool_set(&config).inspect_err(|e| error!("Startup failed: {}", e))?;

    let transport = TransportService::new(config.transport.clone());
    let server = McpServer::new(config, tools).context("failed to build tool registry")?;

    info!("Server initialized");

    transport.run(server).await.context("transport failed")?;

    info!("Server shutting down");

    Ok(())
}

/// Initialize the logging subsystem.
///
/// Logs always go to stderr: stdout is the protocol channel. `RUST_LOG`
/// directives are honoured on top of the configured level.
pub fn init_logging(config: &LoggingConfig) {
    let level = parse_level(&config.level);
    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let builder = fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .with_ansi(false)
        .with_writer(std::io::stderr);

    // A subscriber may already be installed (tests, embedding).
    let _ = if config.with_timestamps {
        builder.try_init()
    } else {
        builder.without_time().try_init()
    };
}

fn parse_level(level: &str) -> Level {
    match level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("warn"), Level::WARN);
        assert_eq!(parse_level("verbose"), Level::INFO);
    }

    #[test]
    fn test_init_logging_twice_is_harmless() {
        let config = LoggingConfig {
            level: "debug".to_string(),
            with_timestamps: false,
        };
        init_logging(&config);
        init_logging(&config);
    }
}
