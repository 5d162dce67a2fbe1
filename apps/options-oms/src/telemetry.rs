//! Tracing Setup
//!
//! Initializes the `tracing` subscriber for the OMS binary.
//!
//! # Configuration
//!
//! - `RUST_LOG`: filter directives; overrides `observability.logging.level`
//! - `observability.logging.format`: `json` (default) or `pretty`
//!
//! # Usage
//!
//! ```rust,ignore
//! use options_oms::telemetry::init_tracing;
//!
//! init_tracing(&config.observability.logging)?;
//! ```

use tracing_subscriber::EnvFilter;
use tracing_subscriber::util::TryInitError;

use crate::config::LoggingConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// One JSON object per event.
    Json,
    /// Human-readable, colored when attached to a terminal.
    Pretty,
}

impl LogFormat {
    /// Parse a configured format name, defaulting to JSON.
    #[must_use]
    pub fn from_name(name: &str) -> Self {
        if name.eq_ignore_ascii_case("pretty") {
            Self::Pretty
        } else {
            Self::Json
        }
    }
}

/// Build the filter: `RUST_LOG` if set, otherwise the configured level.
#[must_use]
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
}

/// Install the global tracing subscriber.
///
/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let filter = env_filter(&config.level);
    let registry = tracing_subscriber::registry().with(filter);

    match LogFormat::from_name(&config.format) {
        LogFormat::Json => registry
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_target(true),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .try_init(),
    }
}
