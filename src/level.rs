use crate::error::ParseLevelError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Severity of a log record.
///
/// The derived ordering is the filtering order: a logger configured with
/// a minimum level drops everything strictly below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Level {
    Debug,
    Info,
    Warn,
    Error,
    /// Highest severity. Only recorded; the logger never exits the process.
    Fatal,
}

impl Level {
    pub const ALL: [Level; 5] = [Level::Debug, Level::Info, Level::Warn, Level::Error, Level::Fatal];

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Debug => "DEBUG",
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Fatal => "FATAL",
        }
    }

    /// Records at this level are mirrored to the error sink.
    pub fn is_error(&self) -> bool {
        *self >= Level::Error
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debug" | "trace" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warn),
            "error" | "err" => Ok(Level::Error),
            "fatal" => Ok(Level::Fatal),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

impl From<tracing::Level> for Level {
    fn from(level: tracing::Level) -> Self {
        match level {
            tracing::Level::TRACE | tracing::Level::DEBUG => Level::Debug,
            tracing::Level::INFO => Level::Info,
            tracing::Level::WARN => Level::Warn,
            tracing::Level::ERROR => Level::Error,
        }
    }
}

/// How the level name is rendered under the level key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LevelEncoding {
    /// `INFO`, `WARN`, ...
    #[default]
    Capital,
    /// `info`, `warn`, ...
    Lowercase,
}

impl LevelEncoding {
    pub fn encode(&self, level: Level) -> String {
        match self {
            LevelEncoding::Capital => level.as_str().to_string(),
            LevelEncoding::Lowercase => level.as_str().to_ascii_lowercase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_is_fixed() {
        assert!(Level::Debug < Level::Info);
        assert!(Level::Info < Level::Warn);
        assert!(Level::Warn < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }

    #[test]
    fn parses_aliases_case_insensitively() {
        assert_eq!("INFO".parse::<Level>().unwrap(), Level::Info);
        assert_eq!(" warning ".parse::<Level>().unwrap(), Level::Warn);
        assert_eq!("Err".parse::<Level>().unwrap(), Level::Error);
        assert_eq!("verbose".parse::<Level>(), Err(ParseLevelError("verbose".into())));
    }

    #[test]
    fn error_threshold() {
        let mirrored: Vec<_> = Level::ALL.iter().filter(|l| l.is_error()).collect();
        assert_eq!(mirrored, vec![&Level::Error, &Level::Fatal]);
    }

    #[test]
    fn lowercase_encoding() {
        assert_eq!(LevelEncoding::Lowercase.encode(Level::Warn), "warn");
        assert_eq!(LevelEncoding::default().encode(Level::Warn), "WARN");
    }
}
