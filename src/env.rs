//! Environment variable names understood by
//! [`LoggerConfig::from_env`](crate::config::LoggerConfig::from_env).
//!
//! Every variable is optional; unset variables keep the compiled-in
//! default profile.

/// Logical service name, reported as `Attributes."service.name"`.
pub const LOG_SERVICE_NAME_ENV: &str = "LOG_SERVICE_NAME";

/// Service version, reported as `Attributes."service.version"`.
pub const LOG_SERVICE_VERSION_ENV: &str = "LOG_SERVICE_VERSION";

/// Owning team, reported as `Annotations.team`.
pub const LOG_TEAM_ENV: &str = "LOG_TEAM";

/// Team contact, reported as `Annotations.contact`.
pub const LOG_TEAM_CONTACT_ENV: &str = "LOG_TEAM_CONTACT";

/// Runbook / handbook URL, reported as `Annotations.handbook`.
pub const LOG_HANDBOOK_URL_ENV: &str = "LOG_HANDBOOK_URL";

/// Minimum level, e.g. `debug`, `info`, `warn`.
pub const LOG_LEVEL_ENV: &str = "LOG_LEVEL";

/// Destination of all records: `stdout`, `stderr`, `discard` or a file path.
pub const LOG_OUTPUT_ENV: &str = "LOG_OUTPUT";

/// Destination of error records and internal write errors.
pub const LOG_ERROR_OUTPUT_ENV: &str = "LOG_ERROR_OUTPUT";

/// Read an environment variable, treating unset, non-unicode and blank
/// values alike as absent.
pub fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
