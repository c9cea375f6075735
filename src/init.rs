use crate::config::LoggerConfig;
use crate::error::BuildError;
use crate::layer::JsonLogLayer;
use crate::logger::Logger;
use tracing_subscriber::layer::{Layered, SubscriberExt};
use tracing_subscriber::Registry;

/// Top-level startup routine: build the process logger.
///
/// **Returns**
/// - the ready [`Logger`], or
/// - the [`BuildError`] that prevented construction. Callers are expected
///   to treat this as fatal and terminate rather than run without logs.
pub fn startup(config: LoggerConfig) -> Result<Logger, BuildError> {
    Logger::build(config)
}

/// [`startup`] with the default profile overlaid by `LOG_*` environment
/// variables.
pub fn startup_from_env() -> Result<Logger, BuildError> {
    startup(LoggerConfig::from_env()?)
}

/// A [`Registry`] whose events are written by `logger`.
///
/// Use with `tracing::subscriber::with_default` for scoped installation.
pub fn subscriber(logger: Logger) -> Layered<JsonLogLayer, Registry> {
    Registry::default().with(JsonLogLayer::new(logger))
}

/// Install `logger` as the global `tracing` subscriber so that
/// `tracing::info!` and friends produce JSON records.
///
/// **Errors**
///
/// [`BuildError::Subscriber`] if a global subscriber is already set.
pub fn init_tracing(logger: Logger) -> Result<(), BuildError> {
    tracing::subscriber::set_global_default(subscriber(logger))?;
    Ok(())
}
