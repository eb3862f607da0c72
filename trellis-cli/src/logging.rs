//! Structured diagnostics for the trellis binary.
//!
//! All events go to stderr so the rendered tree on stdout stays
//! machine-readable. `RUST_LOG` controls the filter; `TRELLIS_LOG_FORMAT`
//! switches between human-readable lines and one JSON object per event.
//! Events emitted through the `log` facade are bridged into the same
//! subscriber.

use std::{env, str::FromStr, sync::OnceLock};

use thiserror::Error;
use tracing_log::LogTracer;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

const FORMAT_VAR: &str = "TRELLIS_LOG_FORMAT";

static INSTALLED: OnceLock<()> = OnceLock::new();

/// Output format of the diagnostic stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum LogFormat {
    /// Human-readable line output.
    #[default]
    Human,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "human" => Ok(Self::Human),
            "json" => Ok(Self::Json),
            _ => Err(LoggingError::UnknownFormat {
                provided: raw.trim().to_owned(),
            }),
        }
    }
}

/// Errors raised while setting up the diagnostic stream.
#[derive(Debug, Error)]
pub enum LoggingError {
    /// `TRELLIS_LOG_FORMAT` held something other than `human` or `json`.
    #[error("unknown log format `{provided}` in TRELLIS_LOG_FORMAT; expected `human` or `json`")]
    UnknownFormat {
        /// Raw value supplied by the user.
        provided: String,
    },
    /// `TRELLIS_LOG_FORMAT` held bytes that are not valid UTF-8.
    #[error("TRELLIS_LOG_FORMAT is not valid UTF-8")]
    NonUnicodeFormat,
}

/// Installs the global subscriber on first call; later calls are no-ops.
///
/// A subscriber installed elsewhere (as in test harnesses) is tolerated
/// silently; the requested format is still validated so a misspelt
/// `TRELLIS_LOG_FORMAT` never passes unnoticed.
///
/// # Errors
/// Returns [`LoggingError`] when `TRELLIS_LOG_FORMAT` holds an unknown
/// format name or invalid UTF-8.
pub fn init_logging() -> Result<(), LoggingError> {
    let format = requested_format()?;
    if INSTALLED.set(()).is_err() {
        return Ok(());
    }
    install(format);
    Ok(())
}

fn requested_format() -> Result<LogFormat, LoggingError> {
    match env::var_os(FORMAT_VAR) {
        None => Ok(LogFormat::default()),
        Some(value) => value
            .to_str()
            .ok_or(LoggingError::NonUnicodeFormat)?
            .parse(),
    }
}

fn install(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stderr = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let output = match format {
        LogFormat::Human => stderr.boxed(),
        LogFormat::Json => stderr.json().boxed(),
    };

    // Both global slots may already be owned by an embedding harness, so
    // neither install is allowed to fail the CLI.
    let _ = LogTracer::init();
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(output)
        .try_init();
}
