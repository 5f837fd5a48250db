//! Progress reporting for the conversion.
//!
//! Every conversion step receives a `Report` and notes what it did or
//! skipped. The run log written by the command line tool is one
//! implementation; `LogReport` forwards to the `log` facade instead.

use std::fmt;
use std::io::Write;

/// Sink for human readable progress notes.
pub trait Report {
    /// Record one note. Notes are single lines without trailing newline.
    fn note(&mut self, message: &str);
}

impl<R: Report + ?Sized> Report for &mut R {
    fn note(&mut self, message: &str) {
        (**self).note(message)
    }
}

/// Collects notes in memory.
impl Report for Vec<String> {
    fn note(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Forwards every note to `log::info!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogReport;

impl Report for LogReport {
    fn note(&mut self, message: &str) {
        log::info!("{}", message);
    }
}

/// Writes one line per note into the given writer, and mirrors it at
/// debug level.
///
/// A failed write does not interrupt the conversion: it is logged as a
/// warning and the note is dropped.
pub struct WriteReport<W> {
    inner: W,
}

impl<W: Write> WriteReport<W> {
    /// Create a report writing into `inner`.
    pub fn new(inner: W) -> Self {
        WriteReport { inner }
    }

    /// Flush the underlying writer.
    pub fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }

    /// Take the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl<W: Write> Report for WriteReport<W> {
    fn note(&mut self, message: &str) {
        log::debug!("{}", message);
        if let Err(e) = writeln!(self.inner, "{}", message) {
            log::warn!("could not write to run log: {}", e);
        }
    }
}

impl<W> fmt::Debug for WriteReport<W> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("WriteReport").finish()
    }
}
