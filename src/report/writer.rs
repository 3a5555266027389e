// SPDX-License-Identifier: MIT

//! Serialized line output.

use std::io::Write;
use std::sync::Mutex;

/// Writes complete lines to the underlying stream, one at a time.
///
/// The judge reads the stream line by line, so a line must never be split
/// by another writer.  Each line goes out in a single `write_all` while the
/// lock is held, and the stream is flushed before the lock is released.
pub struct LineWriter<W: Write> {
    out: Mutex<W>,
}

impl LineWriter<std::io::Stderr> {
    /// Writer on the process STDERR, the only channel the judge watches.
    pub fn stderr() -> Self {
        LineWriter::new(std::io::stderr())
    }
}

impl<W: Write> LineWriter<W> {
    pub fn new(out: W) -> Self {
        LineWriter {
            out: Mutex::new(out),
        }
    }

    /// Write the already framed line, which must end in a newline.
    pub fn write_line(&self, line: &str) -> Result<(), std::io::Error> {
        debug_assert!(line.ends_with('\n'), "status lines end with a newline");
        self.access(|out| {
            out.write_all(line.as_bytes())?;
            out.flush()
        })?
    }

    /// Give back the underlying stream.
    pub fn into_inner(self) -> Result<W, std::io::Error> {
        self.out
            .into_inner()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "lock poisoned"))
    }

    /// Generic helper to lock the stream and use it with a provided closure.
    fn access<R, F>(&self, f: F) -> Result<R, std::io::Error>
    where
        F: FnOnce(&mut W) -> R,
    {
        let mut guard = self
            .out
            .lock()
            .map_err(|_| std::io::Error::new(std::io::ErrorKind::BrokenPipe, "lock poisoned"))?;
        Ok(f(&mut *guard))
    }
}
