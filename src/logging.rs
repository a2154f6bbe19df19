//! Structured logging setup.
//!
//! The terminal is the drawing surface, so log lines never go to it. They
//! are written to the file named by `TURTLE_LOG_FILE`; without one, no
//! subscriber is installed and every `tracing` call is a no-op.
//!
//! ## Environment Variables
//!
//! - `TURTLE_LOG` or `RUST_LOG`: filter directive (e.g. `turtle_canvas=debug`)
//! - `TURTLE_LOG_FORMAT`: `pretty`, `compact` or `json`
//! - `TURTLE_LOG_FILE`: path of the log file, appended to
//!
//! ```bash
//! TURTLE_LOG=turtle_canvas=trace TURTLE_LOG_FILE=/tmp/turtle.log turtle-canvas spiral
//! ```

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;

use anyhow::Context;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_FILTER: &str = "turtle_canvas=info,warn";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Pretty,
    Compact,
    Json,
}

impl LogFormat {
    /// Case-insensitive; anything unknown is `Pretty`.
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => Self::Json,
            "compact" => Self::Compact,
            _ => Self::Pretty,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogConfig {
    pub filter: String,
    pub format: LogFormat,
    pub file: Option<PathBuf>,
    pub with_thread_names: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: DEFAULT_FILTER.to_string(),
            format: LogFormat::Pretty,
            file: None,
            with_thread_names: true,
        }
    }
}

impl LogConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Self {
        let filter = var("TURTLE_LOG")
            .or_else(|| var("RUST_LOG"))
            .unwrap_or_else(|| DEFAULT_FILTER.to_string());
        let format = var("TURTLE_LOG_FORMAT")
            .map(|s| LogFormat::parse(&s))
            .unwrap_or_default();
        let file = var("TURTLE_LOG_FILE")
            .filter(|p| !p.is_empty())
            .map(PathBuf::from);
        Self {
            filter,
            format,
            file,
            ..Default::default()
        }
    }
}

/// Install the global subscriber. Returns `false` when logging stays off
/// because no file was configured. Later calls are ignored.
pub fn init(config: LogConfig) -> anyhow::Result<bool> {
    let Some(path) = &config.file else {
        return Ok(false);
    };
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let env_filter =
        EnvFilter::try_new(&config.filter).unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let layer = fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_thread_names(config.with_thread_names);

    let registry = tracing_subscriber::registry().with(env_filter);
    let _ = match config.format {
        LogFormat::Json => tracing::subscriber::set_global_default(registry.with(layer.json())),
        LogFormat::Compact => {
            tracing::subscriber::set_global_default(registry.with(layer.compact()))
        }
        LogFormat::Pretty => tracing::subscriber::set_global_default(registry.with(layer.pretty())),
    };
    Ok(true)
}

/// `init(LogConfig::from_env())`.
pub fn init_from_env() -> anyhow::Result<bool> {
    init(LogConfig::from_env())
}
