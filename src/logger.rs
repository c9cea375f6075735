use crate::config::LoggerConfig;
use crate::error::{BuildError, EmitError};
use crate::level::Level;
use crate::metadata::StaticFields;
use crate::record::{CallSite, Field, FieldValue, LogRecord, RecordEncoder};
use crate::schema::LogSchema;
use crate::sink::LogSink;
use chrono::{SecondsFormat, Utc};
use std::backtrace::Backtrace;
use std::fmt;
use std::panic::Location;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Snapshot of a logger's emission counters.
///
/// Counters are shared by a logger and every child derived from it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EmitStats {
    /// Records written to the primary sink.
    pub emitted: u64,
    /// Records dropped because they were below the minimum level.
    pub filtered: u64,
    /// Records the primary sink failed to accept.
    pub write_failures: u64,
}

#[derive(Default)]
struct Counters {
    emitted: AtomicU64,
    filtered: AtomicU64,
    write_failures: AtomicU64,
}

struct Core {
    schema: LogSchema,
    statics: StaticFields,
    add_caller: bool,
    output: Arc<dyn LogSink>,
    error_output: Arc<dyn LogSink>,
    counters: Counters,
}

/// Leveled JSON logger.
///
/// Cloning is cheap; clones and children created with [`Logger::named`]
/// or [`Logger::with_fields`] share the sinks, the schema, the static
/// fields and the counters. A logger never changes after it is built.
///
/// Emission never fails from the caller's point of view: write errors on
/// the primary sink are reported on the error sink and otherwise dropped.
#[derive(Clone)]
pub struct Logger {
    core: Arc<Core>,
    name: Option<String>,
    context: Arc<[Field]>,
}

impl Logger {
    /// Build a logger from configuration, opening both configured sinks.
    ///
    /// **Errors**
    /// - [`BuildError::EmptyKey`] / [`BuildError::DuplicateKey`] when the
    ///   record layout is inconsistent.
    /// - [`BuildError::OpenSink`] when a destination cannot be opened.
    pub fn build(config: LoggerConfig) -> Result<Self, BuildError> {
        config.validate()?;
        let output = config.output.open()?;
        let error_output = config.error_output.open()?;
        Self::with_sinks(config, output, error_output)
    }

    /// Build a logger writing to caller-supplied sinks. The sink targets
    /// in `config` are ignored.
    pub fn with_sinks(
        config: LoggerConfig,
        output: Arc<dyn LogSink>,
        error_output: Arc<dyn LogSink>,
    ) -> Result<Self, BuildError> {
        config.validate()?;

        let statics = StaticFields::capture(
            config.attributes_key,
            config.annotations_key,
            &config.service,
            &config.team,
            &config.extra_attributes,
            &config.extra_annotations,
        );

        Ok(Self {
            core: Arc::new(Core {
                schema: config.schema,
                statics,
                add_caller: config.add_caller,
                output,
                error_output,
                counters: Counters::default(),
            }),
            name: None,
            context: Arc::from(Vec::new()),
        })
    }

    pub fn schema(&self) -> &LogSchema {
        &self.core.schema
    }

    pub fn static_fields(&self) -> &StaticFields {
        &self.core.statics
    }

    pub fn minimum_level(&self) -> Level {
        self.core.schema.minimum_level
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn enabled(&self, level: Level) -> bool {
        level >= self.core.schema.minimum_level
    }

    pub fn stats(&self) -> EmitStats {
        let c = &self.core.counters;
        EmitStats {
            emitted: c.emitted.load(Ordering::Relaxed),
            filtered: c.filtered.load(Ordering::Relaxed),
            write_failures: c.write_failures.load(Ordering::Relaxed),
        }
    }

    /// Child logger whose records carry `name` under the name key.
    /// Names of nested children are joined with `.`.
    pub fn named(&self, name: &str) -> Logger {
        let name = match &self.name {
            Some(parent) if !name.is_empty() => format!("{}.{}", parent, name),
            Some(parent) => parent.clone(),
            None => name.to_string(),
        };
        Logger {
            core: Arc::clone(&self.core),
            name: if name.is_empty() { None } else { Some(name) },
            context: Arc::clone(&self.context),
        }
    }

    /// Child logger that adds `fields` to every record, ahead of the
    /// arguments of each call.
    pub fn with_fields(&self, fields: &[(&str, FieldValue)]) -> Logger {
        let context: Vec<Field> = self
            .context
            .iter()
            .cloned()
            .chain(fields.iter().map(|(k, v)| (k.to_string(), v.clone())))
            .collect();
        Logger {
            core: Arc::clone(&self.core),
            name: self.name.clone(),
            context: Arc::from(context),
        }
    }

    /// Emit a record with structured arguments.
    ///
    /// The caller reported is the code calling this method.
    #[track_caller]
    pub fn emit(&self, level: Level, message: impl fmt::Display, fields: &[(&str, FieldValue)]) {
        if !self.enabled(level) {
            self.core.counters.filtered.fetch_add(1, Ordering::Relaxed);
            return;
        }
        let fields = fields.iter().map(|(k, v)| (k.to_string(), v.clone())).collect();
        self.log_at(Some(Location::caller().into()), level, message, fields);
    }

    #[track_caller]
    pub fn debug(&self, message: impl fmt::Display) {
        self.emit(Level::Debug, message, &[]);
    }

    #[track_caller]
    pub fn info(&self, message: impl fmt::Display) {
        self.emit(Level::Info, message, &[]);
    }

    #[track_caller]
    pub fn warn(&self, message: impl fmt::Display) {
        self.emit(Level::Warn, message, &[]);
    }

    #[track_caller]
    pub fn error(&self, message: impl fmt::Display) {
        self.emit(Level::Error, message, &[]);
    }

    /// Emit at `FATAL`. The process keeps running; terminating is up to
    /// the caller.
    #[track_caller]
    pub fn fatal(&self, message: impl fmt::Display) {
        self.emit(Level::Fatal, message, &[]);
    }

    /// Emit a record for an already known call-site.
    ///
    /// Used by bridges such as [`JsonLogLayer`](crate::layer::JsonLogLayer)
    /// whose events carry their own source location.
    pub fn log_at(
        &self,
        caller: Option<CallSite>,
        level: Level,
        message: impl fmt::Display,
        fields: Vec<Field>,
    ) {
        let core = &*self.core;
        if !self.enabled(level) {
            core.counters.filtered.fetch_add(1, Ordering::Relaxed);
            return;
        }

        let fields = if self.context.is_empty() {
            fields
        } else {
            self.context.iter().cloned().chain(fields).collect()
        };

        let record = LogRecord {
            timestamp: Utc::now(),
            level,
            name: self.name.clone(),
            caller: caller.filter(|_| core.add_caller),
            message: message.to_string(),
            fields,
            stacktrace: core
                .schema
                .captures_stacktrace(level)
                .then(|| Backtrace::force_capture().to_string()),
        };

        let encoder = RecordEncoder {
            schema: &core.schema,
            statics: &core.statics,
            record: &record,
        };
        let line = match encoder.to_line() {
            Ok(line) => line,
            Err(e) => {
                core.counters.write_failures.fetch_add(1, Ordering::Relaxed);
                self.report(EmitError::from(e));
                return;
            }
        };

        match core.output.write_record(&line) {
            Ok(()) => {
                core.counters.emitted.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => {
                core.counters.write_failures.fetch_add(1, Ordering::Relaxed);
                self.report(EmitError::Write(e));
            }
        }

        if level.is_error() {
            // Nowhere left to report a failure of the error sink itself.
            let _ = core.error_output.write_record(&line);
        }
    }

    /// Surface an emission failure on the error sink.
    fn report(&self, err: EmitError) {
        let line = format!(
            "{} {}\n",
            Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            err
        );
        let _ = self.core.error_output.write_record(line.as_bytes());
    }

    /// Flush both sinks.
    pub fn sync(&self) -> Result<(), EmitError> {
        self.core.output.flush().map_err(EmitError::Flush)?;
        self.core.error_output.flush().map_err(EmitError::Flush)
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("name", &self.name)
            .field("minimum_level", &self.core.schema.minimum_level)
            .field("context", &self.context)
            .finish_non_exhaustive()
    }
}
