//! Capability interfaces
//!
//! The engine never touches files or terminals. It pulls instruction bytes
//! from an [`InstructionSource`], reads `,` values from an [`InputReader`]
//! and emits `.` values to an [`OutputWriter`].

use std::collections::VecDeque;
use std::io::{self, ErrorKind, Read};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::cell::Cell;

/// Forward-only supplier of instruction bytes
pub trait InstructionSource {
    /// Next byte, or `None` once the input is cleanly exhausted
    fn next_instruction(&mut self) -> io::Result<Option<u8>>;
}

impl<S: InstructionSource + ?Sized> InstructionSource for &mut S {
    fn next_instruction(&mut self) -> io::Result<Option<u8>> {
        (**self).next_instruction()
    }
}

impl<S: InstructionSource + ?Sized> InstructionSource for Box<S> {
    fn next_instruction(&mut self) -> io::Result<Option<u8>> {
        (**self).next_instruction()
    }
}

/// Instruction source over any [`Read`], one byte per request
///
/// Wrap unbuffered readers in a `BufReader` first; this adapter issues a
/// single-byte read for every instruction.
#[derive(Debug)]
pub struct ReadSource<R> {
    inner: R,
}

impl<R: Read> ReadSource<R> {
    /// Wrap a reader
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Unwrap the reader
    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> InstructionSource for ReadSource<R> {
    fn next_instruction(&mut self) -> io::Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
    }
}

/// Supplier of values for the `,` instruction
pub trait InputReader<C: Cell> {
    /// Read one value; `hint` describes what is being asked for
    fn read(&mut self, hint: &str) -> io::Result<C>;
}

/// Consumer of values from the `.` instruction
pub trait OutputWriter<C: Cell> {
    /// Emit one value
    fn write(&mut self, value: C) -> io::Result<()>;

    /// Flush buffered values; called once when a run finishes
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Input that always fails; for programs that never read
#[derive(Debug, Default, Clone, Copy)]
pub struct NoInput;

impl<C: Cell> InputReader<C> for NoInput {
    fn read(&mut self, hint: &str) -> io::Result<C> {
        Err(io::Error::new(
            ErrorKind::Unsupported,
            format!("no input available ({hint})"),
        ))
    }
}

/// Output that discards every value
#[derive(Debug, Default, Clone, Copy)]
pub struct NullOutput;

impl<C: Cell> OutputWriter<C> for NullOutput {
    fn write(&mut self, _value: C) -> io::Result<()> {
        Ok(())
    }
}

/// Input fed from a fixed queue of values
///
/// Hints passed to [`InputReader::read`] are recorded and can be inspected
/// through [`ScriptedInput::hints`]. Reading past the end of the queue fails
/// with `UnexpectedEof`.
#[derive(Debug, Clone)]
pub struct ScriptedInput<C> {
    state: Arc<Mutex<ScriptedState<C>>>,
}

#[derive(Debug)]
struct ScriptedState<C> {
    values: VecDeque<C>,
    hints: Vec<String>,
}

impl<C: Cell> ScriptedInput<C> {
    /// Queue `values` to be returned in order
    pub fn new(values: impl IntoIterator<Item = C>) -> Self {
        Self {
            state: Arc::new(Mutex::new(ScriptedState {
                values: values.into_iter().collect(),
                hints: Vec::new(),
            })),
        }
    }

    /// Input with no values
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Hints received so far
    pub fn hints(&self) -> Vec<String> {
        self.state.lock().hints.clone()
    }

    /// Number of values not yet read
    pub fn remaining(&self) -> usize {
        self.state.lock().values.len()
    }
}

impl<C: Cell> InputReader<C> for ScriptedInput<C> {
    fn read(&mut self, hint: &str) -> io::Result<C> {
        let mut state = self.state.lock();
        state.hints.push(hint.to_string());
        state
            .values
            .pop_front()
            .ok_or_else(|| io::Error::new(ErrorKind::UnexpectedEof, "input script exhausted"))
    }
}

/// Output collected into a shared vector
///
/// Clones share the same buffer, so one handle can be given to an
/// interpreter while another is kept for inspection.
#[derive(Debug, Clone)]
pub struct CapturedOutput<C> {
    values: Arc<Mutex<Vec<C>>>,
}

impl<C: Cell> CapturedOutput<C> {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self {
            values: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Values written so far
    pub fn values(&self) -> Vec<C> {
        self.values.lock().clone()
    }

    /// Remove and return everything written so far
    pub fn take(&self) -> Vec<C> {
        std::mem::take(&mut *self.values.lock())
    }
}

impl<C: Cell> Default for CapturedOutput<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cell> OutputWriter<C> for CapturedOutput<C> {
    fn write(&mut self, value: C) -> io::Result<()> {
        self.values.lock().push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingRead;

    impl Read for FailingRead {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::other("broken pipe"))
        }
    }

    #[test]
    fn test_read_source_yields_bytes_then_end() {
        let mut source = ReadSource::new(&b"+-"[..]);
        assert_eq!(source.next_instruction().unwrap(), Some(b'+'));
        assert_eq!(source.next_instruction().unwrap(), Some(b'-'));
        assert_eq!(source.next_instruction().unwrap(), None);
        assert_eq!(source.next_instruction().unwrap(), None);
    }

    #[test]
    fn test_read_source_propagates_errors() {
        let mut source = ReadSource::new(FailingRead);
        assert!(source.next_instruction().is_err());
    }

    #[test]
    fn test_scripted_input() {
        let mut input = ScriptedInput::new([5i32, -1]);
        let observer = input.clone();
        assert_eq!(input.read("first").unwrap(), 5);
        assert_eq!(input.read("second").unwrap(), -1);
        let err = input.read("third").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEof);
        assert_eq!(observer.hints(), vec!["first", "second", "third"]);
        assert_eq!(observer.remaining(), 0);
    }

    #[test]
    fn test_captured_output_shares_buffer() {
        let output = CapturedOutput::<i16>::new();
        let mut writer = output.clone();
        writer.write(1).unwrap();
        writer.write(2).unwrap();
        assert_eq!(output.values(), vec![1, 2]);
        assert_eq!(output.take(), vec![1, 2]);
        assert!(output.values().is_empty());
    }

    #[test]
    fn test_no_input_fails() {
        let err = InputReader::<i32>::read(&mut NoInput, "hint").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Unsupported);
    }
}
