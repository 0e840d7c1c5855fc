//! Global tracing subscriber.
//!
//! Logs go to stderr so stdout stays a clean stream of JSON snapshots.

use std::sync::OnceLock;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Overrides the configured filter when set and non-empty.
pub const LOG_ENV_VAR: &str = "WAYFARER_LOG";

static LOGGING_INIT: OnceLock<()> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// `EnvFilter` directive, e.g. `info` or `wayfarer_nav=debug,info`.
    pub level: String,
    pub json: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".into(),
            json: false,
        }
    }
}

/// Pick the filter directive: the environment wins over `configured`.
pub fn resolve_level(env_value: Option<&str>, configured: &str) -> String {
    env_value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(configured)
        .to_owned()
}

/// Install the global subscriber. Later calls are no-ops.
pub fn init_logging(options: &LoggingOptions) -> Result<()> {
    if LOGGING_INIT.get().is_some() {
        return Ok(());
    }

    let env_value = std::env::var(LOG_ENV_VAR).ok();
    let level = resolve_level(env_value.as_deref(), &options.level);
    let env_filter = EnvFilter::try_new(&level).unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = fmt::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_names(true);
    let init_result = if options.json {
        builder.json().try_init()
    } else {
        builder.compact().try_init()
    };
    init_result.map_err(|err| anyhow::anyhow!("failed to initialize logging: {err}"))?;
    LOGGING_INIT.set(()).ok();

    info!(level = level.as_str(), json = options.json, "logging initialized");
    Ok(())
}
