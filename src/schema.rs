use crate::error::BuildError;
use crate::level::{Level, LevelEncoding};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use serde_json::Value;
use std::time::Duration;

/// How the per-record timestamp is rendered under the time key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimeEncoding {
    /// RFC3339 in the local offset with second precision,
    /// e.g. `2024-05-01T12:00:00+02:00`.
    #[default]
    Rfc3339,
    /// RFC3339 with nanosecond precision.
    Rfc3339Nano,
    /// Milliseconds since the Unix epoch, as a number.
    EpochMillis,
}

impl TimeEncoding {
    pub fn encode(&self, at: DateTime<Utc>) -> Value {
        match self {
            TimeEncoding::Rfc3339 => {
                Value::String(at.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Secs, true))
            }
            TimeEncoding::Rfc3339Nano => {
                Value::String(at.with_timezone(&Local).to_rfc3339_opts(SecondsFormat::Nanos, true))
            }
            TimeEncoding::EpochMillis => Value::from(at.timestamp_millis()),
        }
    }
}

/// How [`Duration`] field values are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DurationEncoding {
    /// Floating point milliseconds.
    #[default]
    Millis,
    /// Floating point seconds.
    Seconds,
    /// Integer nanoseconds.
    Nanos,
}

impl DurationEncoding {
    pub fn encode(&self, d: Duration) -> Value {
        match self {
            DurationEncoding::Millis => Value::from(d.as_secs_f64() * 1000.0),
            DurationEncoding::Seconds => Value::from(d.as_secs_f64()),
            DurationEncoding::Nanos => Value::from(u64::try_from(d.as_nanos()).unwrap_or(u64::MAX)),
        }
    }
}

/// How the call-site is rendered under the caller key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallerEncoding {
    /// Last directory and file name: `src/main.rs:42`.
    #[default]
    Short,
    /// Path exactly as recorded by the compiler.
    Full,
}

impl CallerEncoding {
    pub fn encode(&self, file: &str, line: u32) -> String {
        match self {
            CallerEncoding::Full => format!("{}:{}", file, line),
            CallerEncoding::Short => format!("{}:{}", trim_path(file), line),
        }
    }
}

fn trim_path(file: &str) -> &str {
    let mut seps = file.rmatch_indices(|c: char| c == '/' || c == '\\');
    match (seps.next(), seps.next()) {
        (Some(_), Some((idx, _))) => &file[idx + 1..],
        _ => file,
    }
}

/// Output layout of every record: key names, encoders and filtering.
///
/// The defaults reproduce the production profile:
///
/// ```text
/// {"Severity":"INFO","Timestamp":"...","Caller":"src/main.rs:12","Body":"...",
///  "Annotations":{...},"Attributes":{...}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogSchema {
    pub message_key: String,
    pub level_key: String,
    pub time_key: String,
    pub name_key: String,
    pub caller_key: String,
    pub stacktrace_key: String,
    pub minimum_level: Level,
    /// Records at or above this level carry a captured stack trace.
    /// `None` disables stack traces entirely.
    pub stacktrace_level: Option<Level>,
    pub level_encoding: LevelEncoding,
    pub time_encoding: TimeEncoding,
    pub duration_encoding: DurationEncoding,
    pub caller_encoding: CallerEncoding,
}

impl Default for LogSchema {
    fn default() -> Self {
        Self {
            message_key: "Body".to_string(),
            level_key: "Severity".to_string(),
            time_key: "Timestamp".to_string(),
            name_key: "Key".to_string(),
            caller_key: "Caller".to_string(),
            stacktrace_key: "Trace".to_string(),
            minimum_level: Level::Info,
            stacktrace_level: None,
            level_encoding: LevelEncoding::Capital,
            time_encoding: TimeEncoding::Rfc3339,
            duration_encoding: DurationEncoding::Millis,
            caller_encoding: CallerEncoding::Short,
        }
    }
}

impl LogSchema {
    /// Key names reserved by the schema, in emission order.
    pub fn keys(&self) -> [(&'static str, &str); 6] {
        [
            ("level_key", self.level_key.as_str()),
            ("time_key", self.time_key.as_str()),
            ("name_key", self.name_key.as_str()),
            ("caller_key", self.caller_key.as_str()),
            ("message_key", self.message_key.as_str()),
            ("stacktrace_key", self.stacktrace_key.as_str()),
        ]
    }

    pub fn is_reserved(&self, key: &str) -> bool {
        self.keys().iter().any(|(_, k)| *k == key)
    }

    /// Reject layouts that could produce a record with an empty or
    /// repeated key.
    pub fn validate(&self) -> Result<(), BuildError> {
        let keys = self.keys();
        for (i, (role, key)) in keys.iter().enumerate() {
            if key.is_empty() {
                return Err(BuildError::EmptyKey(*role));
            }
            if keys[..i].iter().any(|(_, other)| other == key) {
                return Err(BuildError::DuplicateKey(key.to_string()));
            }
        }
        Ok(())
    }

    pub fn captures_stacktrace(&self, level: Level) -> bool {
        self.stacktrace_level.is_some_and(|min| level >= min)
    }
}
