//! Instruction sources backed by files and stdin

use std::fs::File;
use std::io::{self, BufReader, Stdin};
use std::path::Path;

use rill_vm_core::ReadSource;
use tracing::debug;

/// Buffered instruction source over a program file
pub type FileSource = ReadSource<BufReader<File>>;

/// Instruction source over the process's standard input
pub type StdinSource = ReadSource<BufReader<Stdin>>;

/// Open a program file for streaming execution
pub fn open_program(path: impl AsRef<Path>) -> io::Result<FileSource> {
    let path = path.as_ref();
    let file = File::open(path)?;
    debug!(path = %path.display(), "program opened");
    Ok(ReadSource::new(BufReader::new(file)))
}

/// Stream a program from standard input
pub fn stdin_program() -> StdinSource {
    ReadSource::new(BufReader::new(io::stdin()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rill_vm_core::InstructionSource;

    use super::*;

    #[test]
    fn test_open_program_streams_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"+[-]").unwrap();

        let mut source = open_program(file.path()).unwrap();
        let mut bytes = Vec::new();
        while let Some(byte) = source.next_instruction().unwrap() {
            bytes.push(byte);
        }
        assert_eq!(bytes, b"+[-]");
    }

    #[test]
    fn test_open_missing_program() {
        let dir = tempfile::tempdir().unwrap();
        let err = open_program(dir.path().join("missing.rill")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
