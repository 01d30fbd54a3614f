use thiserror::Error;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

/// Failures while installing the log subscriber.
#[derive(Error, Debug)]
pub enum TelemetryError {
    /// Configured `logging.level` is not a valid filter directive
    #[error("invalid logging.level '{level}': {source}")]
    Level {
        level: String,
        #[source]
        source: ParseError,
    },

    /// A global subscriber is already installed
    #[error("could not install log subscriber: {0}")]
    Install(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Log to stderr so stdout stays pure JSON. `RUST_LOG` overrides `level`.
pub fn init(level: &str) -> Result<(), TelemetryError> {
    let filter = EnvFilter::try_from_default_env().or_else(|_| {
        EnvFilter::try_new(level).map_err(|source| TelemetryError::Level {
            level: level.to_string(),
            source,
        })
    })?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::Install)
}
