use crate::sink::LogSink;
use std::io;

/// A sink that simply drops all records.
///
/// Selected with the `discard` destination. Useful for measuring the
/// encoding overhead of the logger without any I/O.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {
    fn write_record(&self, _line: &[u8]) -> io::Result<()> {
        Ok(())
    }
}
