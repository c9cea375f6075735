use crate::level::Level;
use crate::metadata::StaticFields;
use crate::schema::LogSchema;
use chrono::{DateTime, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;
use std::panic::Location;
use std::time::Duration;

/// Source location of the code that issued a log call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallSite {
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub fn new(file: &'static str, line: u32) -> Self {
        Self { file, line }
    }
}

impl From<&'static Location<'static>> for CallSite {
    fn from(location: &'static Location<'static>) -> Self {
        Self::new(location.file(), location.line())
    }
}

/// Value of a structured argument.
///
/// Durations are kept apart so they can be rendered with the schema's
/// [`DurationEncoding`](crate::schema::DurationEncoding).
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Json(Value),
    Duration(Duration),
}

macro_rules! json_field_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for FieldValue {
                fn from(v: $ty) -> Self {
                    FieldValue::Json(Value::from(v))
                }
            }
        )*
    };
}

json_field_from!(&str, String, bool, i32, i64, u32, u64, f64, Value);

impl From<Duration> for FieldValue {
    fn from(d: Duration) -> Self {
        FieldValue::Duration(d)
    }
}

/// A structured argument: key and value.
pub type Field = (String, FieldValue);

/// One log event, before encoding.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Utc>,
    pub level: Level,
    pub name: Option<String>,
    pub caller: Option<CallSite>,
    pub message: String,
    pub fields: Vec<Field>,
    pub stacktrace: Option<String>,
}

/// Serializes a [`LogRecord`] against a schema and the logger's static
/// fields, keeping key order stable:
/// level, time, name, caller, message, arguments, static fields, stack trace.
///
/// Argument keys already taken by the schema, by the static fields or by
/// an earlier argument are skipped so that no key repeats in a record.
pub struct RecordEncoder<'a> {
    pub schema: &'a LogSchema,
    pub statics: &'a StaticFields,
    pub record: &'a LogRecord,
}

impl RecordEncoder<'_> {
    fn is_taken(&self, key: &str, seen: &[&str]) -> bool {
        self.schema.is_reserved(key)
            || self.statics.entries().iter().any(|(k, _)| *k == key)
            || seen.contains(&key)
    }

    fn encode_value(&self, value: &FieldValue) -> Value {
        match value {
            FieldValue::Json(v) => v.clone(),
            FieldValue::Duration(d) => self.schema.duration_encoding.encode(*d),
        }
    }

    /// Encode into one newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>, serde_json::Error> {
        let mut line = serde_json::to_vec(self)?;
        line.push(b'\n');
        Ok(line)
    }
}

impl Serialize for RecordEncoder<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let schema = self.schema;
        let record = self.record;
        let mut map = serializer.serialize_map(None)?;

        map.serialize_entry(&schema.level_key, &schema.level_encoding.encode(record.level))?;
        map.serialize_entry(&schema.time_key, &schema.time_encoding.encode(record.timestamp))?;
        if let Some(name) = &record.name {
            map.serialize_entry(&schema.name_key, name)?;
        }
        if let Some(caller) = &record.caller {
            map.serialize_entry(
                &schema.caller_key,
                &schema.caller_encoding.encode(caller.file, caller.line),
            )?;
        }
        map.serialize_entry(&schema.message_key, &record.message)?;

        let mut seen: Vec<&str> = Vec::with_capacity(record.fields.len());
        for (key, value) in &record.fields {
            if self.is_taken(key, &seen) {
                continue;
            }
            map.serialize_entry(key, &self.encode_value(value))?;
            seen.push(key);
        }

        for (key, value) in self.statics.entries() {
            map.serialize_entry(key, value)?;
        }

        if let Some(trace) = &record.stacktrace {
            map.serialize_entry(&schema.stacktrace_key, trace)?;
        }

        map.end()
    }
}
