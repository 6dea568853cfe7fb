//! Bytecode errors

use thiserror::Error;

/// Errors that can occur while decoding instruction bytes
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BytecodeError {
    /// Byte is not part of the baseline instruction set
    #[error("Invalid opcode: {0:#04x}")]
    InvalidOpcode(u8),
}

/// Result type for bytecode operations
pub type Result<T> = std::result::Result<T, BytecodeError>;
