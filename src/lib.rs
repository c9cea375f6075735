//! Leveled JSON logging with a fixed record layout.
//!
//! A [`Logger`] writes one JSON object per line with configurable key
//! names, a severity floor, and two static objects (service attributes
//! and team annotations) captured once at construction:
//!
//! ```no_run
//! use gedai_log::{init::startup, LoggerConfig};
//!
//! let logger = startup(LoggerConfig::default()).expect("logger");
//! logger.info("Hi there!");
//! // {"Severity":"INFO","Timestamp":"2024-05-01T12:00:00+02:00","Caller":"src/main.rs:4",
//! //  "Body":"Hi there!","Annotations":{...},"Attributes":{...}}
//! ```

pub mod config;
pub mod env;
pub mod error;
pub mod init;
pub mod layer;
pub mod level;
pub mod logger;
pub mod metadata;
pub mod noop_sink;
pub mod record;
pub mod schema;
pub mod sink;

pub use config::LoggerConfig;
pub use error::{BuildError, EmitError};
pub use level::Level;
pub use logger::Logger;
pub use record::FieldValue;
pub use sink::{LogSink, SinkTarget};
