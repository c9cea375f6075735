use std::io;

/// Error returned when a [`Logger`](crate::logger::Logger) cannot be
/// constructed.
///
/// Construction failures are fatal for the host process: the startup
/// routine hands this value back and the binary decides to terminate.
#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("encoder key `{0}` must not be empty")]
    EmptyKey(&'static str),

    #[error("key `{0}` is used more than once in the record layout")]
    DuplicateKey(String),

    #[error("unknown or unsupported sink destination `{0}`")]
    UnknownSink(String),

    #[error("cannot open sink `{target}`: {source}")]
    OpenSink {
        target: String,
        #[source]
        source: io::Error,
    },

    #[error(transparent)]
    InvalidLevel(#[from] ParseLevelError),

    #[error("cannot install global tracing subscriber: {0}")]
    Subscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

/// Failure while writing an encoded record to a sink.
///
/// Never returned from the emission path; it is reported on the error
/// sink instead. [`Logger::sync`](crate::logger::Logger::sync) does return it.
#[derive(thiserror::Error, Debug)]
pub enum EmitError {
    #[error("write error: {0}")]
    Write(#[source] io::Error),

    #[error("sync error: {0}")]
    Flush(#[source] io::Error),

    #[error("encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized level `{0}`")]
pub struct ParseLevelError(pub String);
