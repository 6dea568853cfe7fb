//! Output writers for the `.` instruction

use std::fs::File;
use std::io::{self, BufWriter, Stdout, Write};
use std::path::Path;

use rill_vm_core::{Cell, OutputWriter};

/// How a [`ValueWriter`] renders cell values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputFormat {
    /// Decimal text followed by `separator`
    Decimal {
        /// Written after every value
        separator: String,
    },
    /// The cell's low byte, written raw
    Byte,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Decimal {
            separator: "\n".to_string(),
        }
    }
}

/// Formats cell values onto any [`Write`]
#[derive(Debug)]
pub struct ValueWriter<W: Write> {
    inner: W,
    format: OutputFormat,
}

impl<W: Write> ValueWriter<W> {
    /// Wrap a writer
    pub fn new(inner: W, format: OutputFormat) -> Self {
        Self { inner, format }
    }

    /// Output format
    pub fn format(&self) -> &OutputFormat {
        &self.format
    }

    /// Unwrap the writer
    pub fn into_inner(self) -> W {
        self.inner
    }
}

impl ValueWriter<BufWriter<Stdout>> {
    /// Buffered writer to standard output
    pub fn stdout(format: OutputFormat) -> Self {
        Self::new(BufWriter::new(io::stdout()), format)
    }
}

impl ValueWriter<BufWriter<File>> {
    /// Create (or truncate) `path` and write values to it
    pub fn create(path: impl AsRef<Path>, format: OutputFormat) -> io::Result<Self> {
        Ok(Self::new(BufWriter::new(File::create(path)?), format))
    }
}

impl<W: Write, C: Cell> OutputWriter<C> for ValueWriter<W> {
    fn write(&mut self, value: C) -> io::Result<()> {
        match &self.format {
            OutputFormat::Decimal { separator } => write!(self.inner, "{value}{separator}"),
            OutputFormat::Byte => self.inner.write_all(&[value.to_byte()]),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_output() {
        let mut writer = ValueWriter::new(Vec::new(), OutputFormat::default());
        writer.write(42i32).unwrap();
        writer.write(-1i32).unwrap();
        assert_eq!(writer.into_inner(), b"42\n-1\n");
    }

    #[test]
    fn test_custom_separator() {
        let format = OutputFormat::Decimal {
            separator: " ".to_string(),
        };
        let mut writer = ValueWriter::new(Vec::new(), format);
        for v in [1i64, 2, 3] {
            writer.write(v).unwrap();
        }
        assert_eq!(writer.into_inner(), b"1 2 3 ");
    }

    #[test]
    fn test_byte_output_truncates() {
        let mut writer = ValueWriter::new(Vec::new(), OutputFormat::Byte);
        writer.write(72i32).unwrap();
        writer.write(256 + 105i32).unwrap();
        writer.write(-1i8).unwrap();
        assert_eq!(writer.into_inner(), vec![b'H', b'i', 0xff]);
    }
}
