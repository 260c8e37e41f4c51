//! Diagnostic logging through `tracing`.
//!
//! Diagnostics (skipped files, failed loads, fall-throughs) go to stderr via
//! `tracing`. User-facing summaries are not logs and stay in [`crate::output`].
//!
//! | Level | Used for |
//! |-------|----------|
//! | `error` | reader failures: missing catalog, unknown article, failed fetch |
//! | `warn` | files skipped during a build |
//! | `info` | catalog loaded, article loaded |
//! | `debug` | files written, stale responses, ignored front matter |
//!
//! `RUST_LOG` overrides the verbosity flags when set.

use std::io::IsTerminal;
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub level: Level,
    pub with_target: bool,
    /// Colors only when stderr is a terminal.
    pub with_ansi: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: Level::WARN,
            with_target: false,
            with_ansi: std::io::stderr().is_terminal(),
        }
    }
}

impl LogConfig {
    /// 0 → warn, 1 (`-v`) → info, 2 (`-vv`) → debug, more → trace.
    #[must_use]
    pub fn from_verbosity(verbosity: u8) -> Self {
        let level = match verbosity {
            0 => Level::WARN,
            1 => Level::INFO,
            2 => Level::DEBUG,
            _ => Level::TRACE,
        };
        Self {
            level,
            with_target: verbosity >= 2,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn with_ansi(mut self, enable: bool) -> Self {
        self.with_ansi = enable;
        self
    }
}

/// Install the global subscriber. A second call is a no-op.
pub fn init_logging(config: &LogConfig) {
    let layer = fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_ansi(config.with_ansi)
        .with_target(config.with_target);

    let _ = tracing_subscriber::registry()
        .with(build_env_filter(config.level))
        .with(layer)
        .try_init();
}

/// Our crate logs at `level`; dependencies stay at warn.
fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = level.as_str().to_lowercase();
        EnvFilter::new(format!("warn,article_index={level}"))
    })
}
