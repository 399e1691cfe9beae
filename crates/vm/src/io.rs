//! Input and output seams of the VM.
//!
//! READ pulls typed values from an [`Input`]. WRITE and DPRINT push values
//! to an [`Output`]. Both have a line-oriented implementation over any
//! `BufRead`/`Write`, so tests can run against in-memory buffers.

use std::io::{self, BufRead, Write};

/// Source of values for READ.
///
/// Missing or malformed input yields the type's default instead of an error.
pub trait Input {
    fn read_int(&mut self) -> i64;
    fn read_bool(&mut self) -> bool;
    /// Plain, unescaped text.
    fn read_string(&mut self) -> String;
}

/// Sink for WRITE and DPRINT.
pub trait Output {
    fn write_int(&mut self, value: i64) -> io::Result<()>;
    fn write_bool(&mut self, value: bool) -> io::Result<()>;
    /// Plain, unescaped text.
    fn write_string(&mut self, text: &str) -> io::Result<()>;

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Reads one value per line.
pub struct LineInput<R> {
    reader: R,
}

impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }

    /// Next line without its terminator, `None` at end of input.
    fn next_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => {
                if line.ends_with('\n') {
                    line.pop();
                    if line.ends_with('\r') {
                        line.pop();
                    }
                }
                Some(line)
            }
            Err(e) => {
                tracing::debug!(error = %e, "input read failed");
                None
            }
        }
    }
}

impl<R: BufRead> Input for LineInput<R> {
    fn read_int(&mut self) -> i64 {
        self.next_line()
            .and_then(|line| line.trim().parse().ok())
            .unwrap_or(0)
    }

    fn read_bool(&mut self) -> bool {
        self.next_line()
            .is_some_and(|line| line.trim().eq_ignore_ascii_case("true"))
    }

    fn read_string(&mut self) -> String {
        self.next_line().unwrap_or_default()
    }
}

/// Writes values as plain text, without separators.
pub struct StreamOutput<W> {
    writer: W,
}

impl<W: Write> StreamOutput<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Output for StreamOutput<W> {
    fn write_int(&mut self, value: i64) -> io::Result<()> {
        write!(self.writer, "{value}")
    }

    fn write_bool(&mut self, value: bool) -> io::Result<()> {
        write!(self.writer, "{value}")
    }

    fn write_string(&mut self, text: &str) -> io::Result<()> {
        self.writer.write_all(text.as_bytes())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
