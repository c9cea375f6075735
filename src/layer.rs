use crate::level::Level;
use crate::logger::Logger;
use crate::record::{CallSite, Field, FieldValue};
use serde_json::Value;
use tracing::field::{Field as TracingField, Visit};
use tracing::{Event, Metadata, Subscriber};
use tracing_subscriber::layer::{Context, Layer};
use tracing_subscriber::registry::LookupSpan;

/// `tracing_subscriber` layer that turns every `tracing` event into a
/// JSON record written by a [`Logger`].
///
/// The event's `message` becomes the record body, its other fields
/// become top-level arguments and its `file:line` is the call-site.
/// `TRACE` events are treated as `DEBUG`.
#[derive(Debug, Clone)]
pub struct JsonLogLayer {
    logger: Logger,
}

impl JsonLogLayer {
    pub fn new(logger: Logger) -> Self {
        Self { logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }
}

impl<S> Layer<S> for JsonLogLayer
where
    S: Subscriber + for<'span> LookupSpan<'span>,
{
    fn enabled(&self, metadata: &Metadata<'_>, _ctx: Context<'_, S>) -> bool {
        self.logger.enabled(Level::from(*metadata.level()))
    }

    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();

        let mut fields = Vec::new();
        let mut message: Option<String> = None;
        let mut visitor = FieldVisitor { fields: &mut fields, message: &mut message };
        event.record(&mut visitor);

        let caller = match (meta.file(), meta.line()) {
            (Some(file), Some(line)) => Some(CallSite::new(file, line)),
            _ => None,
        };

        self.logger.log_at(
            caller,
            Level::from(*meta.level()),
            message.unwrap_or_default(),
            fields,
        );
    }
}

pub struct FieldVisitor<'a> {
    pub fields: &'a mut Vec<Field>,
    pub message: &'a mut Option<String>,
}

impl FieldVisitor<'_> {
    fn push(&mut self, field: &TracingField, value: Value) {
        self.fields.push((field.name().to_string(), FieldValue::Json(value)));
    }
}

impl Visit for FieldVisitor<'_> {
    fn record_str(&mut self, field: &TracingField, value: &str) {
        if field.name() == "message" {
            *self.message = Some(value.to_string());
        } else {
            self.push(field, Value::String(value.to_string()));
        }
    }

    fn record_i64(&mut self, field: &TracingField, value: i64) {
        self.push(field, Value::from(value));
    }

    fn record_u64(&mut self, field: &TracingField, value: u64) {
        self.push(field, Value::from(value));
    }

    fn record_f64(&mut self, field: &TracingField, value: f64) {
        self.push(field, Value::from(value));
    }

    fn record_bool(&mut self, field: &TracingField, value: bool) {
        self.push(field, Value::from(value));
    }

    fn record_debug(&mut self, field: &TracingField, value: &dyn std::fmt::Debug) {
        // `info!("a {}", b)` records its formatted message through here.
        if field.name() == "message" {
            *self.message = Some(format!("{:?}", value));
        } else {
            self.push(field, Value::String(format!("{:?}", value)));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LoggerConfig;
    use crate::sink::MemorySink;
    use std::sync::Arc;
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Registry;

    fn with_layer<F: FnOnce()>(config: LoggerConfig, f: F) -> (MemorySink, MemorySink) {
        let out = MemorySink::new();
        let err = MemorySink::new();
        let logger = Logger::with_sinks(config, Arc::new(out.clone()), Arc::new(err.clone())).unwrap();
        let subscriber = Registry::default().with(JsonLogLayer::new(logger));
        tracing::subscriber::with_default(subscriber, f);
        (out, err)
    }

    #[test]
    fn forwards_events_with_fields() {
        let (out, err) = with_layer(LoggerConfig::default(), || {
            tracing::info!(user = "alice", attempts = 3u64, ok = true, "login {}", "succeeded");
        });

        let records = out.records();
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record["Severity"], "INFO");
        assert_eq!(record["Body"], "login succeeded");
        assert_eq!(record["user"], "alice");
        assert_eq!(record["attempts"], 3);
        assert_eq!(record["ok"], true);
        assert!(record["Caller"].as_str().unwrap().starts_with("src/layer.rs:"));
        assert!(err.is_empty());
    }

    #[test]
    fn respects_minimum_level_and_mirrors_errors() {
        let (out, err) = with_layer(LoggerConfig::default(), || {
            tracing::trace!("t");
            tracing::debug!("d");
            tracing::warn!("w");
            tracing::error!(code = 500, "e");
        });

        let bodies: Vec<_> = out.records().iter().map(|r| r["Body"].clone()).collect();
        assert_eq!(bodies, vec![Value::from("w"), Value::from("e")]);
        assert_eq!(err.lines(), vec![out.lines()[1].clone()]);
    }

    #[test]
    fn debug_level_admits_trace_events() {
        let (out, _) = with_layer(LoggerConfig::default().with_minimum_level(Level::Debug), || {
            tracing::trace!("t");
        });
        assert_eq!(out.records()[0]["Severity"], "DEBUG");
    }
}
