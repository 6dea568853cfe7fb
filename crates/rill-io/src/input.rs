//! Input readers for the `,` instruction

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, ErrorKind, Read, Stdin, Stdout, Write};
use std::path::Path;

use rill_vm_core::{Cell, InputReader};
use tracing::trace;

/// Reads one raw byte per request; the hint is ignored
#[derive(Debug)]
pub struct ByteInput<R> {
    inner: R,
}

impl<R: Read> ByteInput<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl ByteInput<BufReader<File>> {
    /// Feed input from a file
    pub fn from_file(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl ByteInput<BufReader<Stdin>> {
    /// Feed input from standard input
    pub fn stdin() -> Self {
        Self::new(BufReader::new(io::stdin()))
    }
}

impl<R: Read, C: Cell> InputReader<C> for ByteInput<R> {
    fn read(&mut self, _hint: &str) -> io::Result<C> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        ErrorKind::UnexpectedEof,
                        "input exhausted",
                    ));
                }
                Ok(_) => return Ok(C::from_byte(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Interactive reader over lines
///
/// Each `,` takes the next byte of the current line, newline included. Only
/// when the line is used up is the hint printed and a new line read, so
/// typing `ab` answers three reads: `a`, `b` and `\n`.
#[derive(Debug)]
pub struct PromptInput<R, W> {
    reader: R,
    prompt: W,
    pending: VecDeque<u8>,
}

impl<R: BufRead, W: Write> PromptInput<R, W> {
    /// Read lines from `reader`, writing prompts to `prompt`
    pub fn new(reader: R, prompt: W) -> Self {
        Self {
            reader,
            prompt,
            pending: VecDeque::new(),
        }
    }

    /// Bytes typed but not yet consumed
    pub fn buffered(&self) -> usize {
        self.pending.len()
    }
}

impl PromptInput<BufReader<Stdin>, Stdout> {
    /// Prompt on stdout, read from stdin
    pub fn stdio() -> Self {
        Self::new(BufReader::new(io::stdin()), io::stdout())
    }
}

impl<R: BufRead, W: Write, C: Cell> InputReader<C> for PromptInput<R, W> {
    fn read(&mut self, hint: &str) -> io::Result<C> {
        if self.pending.is_empty() {
            write!(self.prompt, "{hint}: ")?;
            self.prompt.flush()?;

            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Err(io::Error::new(ErrorKind::UnexpectedEof, "input exhausted"));
            }
            self.pending.extend(line);
        }

        let byte = self.pending.pop_front().unwrap_or(b'\n');
        trace!(byte, buffered = self.pending.len(), "prompted input");
        Ok(C::from_byte(byte))
    }
}
