use crate::error::BuildError;
use crate::noop_sink::NoopSink;
use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard};

/// Synchronous destination for encoded log records.
///
/// The logger hands over one complete, newline-terminated JSON line per
/// call. Implementations must write it in a single critical section so
/// that concurrent callers never interleave partial lines.
pub trait LogSink: Send + Sync {
    /// Write a single encoded record.
    ///
    /// **Returns**
    /// - `Ok(())` once the whole line has been handed to the destination.
    /// - `Err(..)` if the destination rejected it. The logger reports the
    ///   failure on its error sink and does not retry.
    fn write_record(&self, line: &[u8]) -> io::Result<()>;

    /// Flush buffered output, if the destination buffers.
    ///
    /// Default implementation is a no-op.
    fn flush(&self) -> io::Result<()> {
        Ok(())
    }
}

/// A sink destination as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkTarget {
    Stdout,
    Stderr,
    /// Drop everything.
    Discard,
    /// Append to a file, creating it if needed.
    File(PathBuf),
}

impl SinkTarget {
    /// Parse a destination string.
    ///
    /// Examples:
    /// - "stdout", "stderr", "discard"
    /// - "file:///var/log/app.json"
    /// - "/var/log/app.json" or "logs/app.json"
    pub fn parse(target: &str) -> Result<Self, BuildError> {
        let trimmed = target.trim();
        let lower = trimmed.to_ascii_lowercase();

        match lower.as_str() {
            "stdout" => Ok(SinkTarget::Stdout),
            "stderr" => Ok(SinkTarget::Stderr),
            "discard" => Ok(SinkTarget::Discard),
            "" => Err(BuildError::UnknownSink(target.to_string())),
            _ if lower.starts_with("file://") => {
                let path = &trimmed["file://".len()..];
                if path.is_empty() {
                    Err(BuildError::UnknownSink(target.to_string()))
                } else {
                    Ok(SinkTarget::File(PathBuf::from(path)))
                }
            }
            _ if lower.contains("://") => Err(BuildError::UnknownSink(target.to_string())),
            _ => Ok(SinkTarget::File(PathBuf::from(trimmed))),
        }
    }

    /// Resolve the destination into a writable sink.
    pub fn open(&self) -> Result<Arc<dyn LogSink>, BuildError> {
        match self {
            SinkTarget::Stdout => Ok(Arc::new(StreamSink::stdout())),
            SinkTarget::Stderr => Ok(Arc::new(StreamSink::stderr())),
            SinkTarget::Discard => Ok(Arc::new(NoopSink)),
            SinkTarget::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .map_err(|source| BuildError::OpenSink {
                        target: self.to_string(),
                        source,
                    })?;
                Ok(Arc::new(WriterSink::new(file)))
            }
        }
    }
}

impl FromStr for SinkTarget {
    type Err = BuildError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SinkTarget::parse(s)
    }
}

impl fmt::Display for SinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkTarget::Stdout => f.write_str("stdout"),
            SinkTarget::Stderr => f.write_str("stderr"),
            SinkTarget::Discard => f.write_str("discard"),
            SinkTarget::File(path) => write!(f, "{}", path.display()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Process standard output or standard error.
///
/// Each record is written while holding the stream's lock and flushed
/// before the lock is released.
#[derive(Debug, Clone, Copy)]
pub struct StreamSink {
    stream: Stream,
}

impl StreamSink {
    pub fn stdout() -> Self {
        Self { stream: Stream::Stdout }
    }

    pub fn stderr() -> Self {
        Self { stream: Stream::Stderr }
    }
}

impl LogSink for StreamSink {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => {
                let mut out = io::stdout().lock();
                out.write_all(line)?;
                out.flush()
            }
            Stream::Stderr => io::stderr().lock().write_all(line),
        }
    }

    fn flush(&self) -> io::Result<()> {
        match self.stream {
            Stream::Stdout => io::stdout().flush(),
            Stream::Stderr => io::stderr().flush(),
        }
    }
}

/// Any [`Write`] implementation behind a mutex.
pub struct WriterSink<W> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer: Mutex::new(writer) }
    }

    fn lock(&self) -> MutexGuard<'_, W> {
        // Poisoning is ignored: no state is kept between two records.
        self.writer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<W: Write + Send> LogSink for WriterSink<W> {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.lock();
        writer.write_all(line)?;
        writer.flush()
    }

    fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }
}

pub type FileSink = WriterSink<File>;

/// In-memory sink; clones share the same buffer.
///
/// Handy for asserting on emitted records in tests.
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buffer.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Raw bytes written so far.
    pub fn bytes(&self) -> Vec<u8> {
        self.lock().clone()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Every line parsed as JSON. Lines that do not parse are skipped.
    pub fn records(&self) -> Vec<serde_json::Value> {
        self.lines()
            .iter()
            .filter_map(|line| serde_json::from_str(line).ok())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl LogSink for MemorySink {
    fn write_record(&self, line: &[u8]) -> io::Result<()> {
        self.lock().extend_from_slice(line);
        Ok(())
    }
}
