//! VM error types

use std::fmt;
use std::io;

use thiserror::Error;

/// Direction of a data pointer move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Towards higher cell indices
    Right,
    /// Towards index zero
    Left,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Right => f.write_str("right"),
            Direction::Left => f.write_str("left"),
        }
    }
}

/// Errors raised by instruction handlers
#[derive(Debug, Error)]
pub enum VmError {
    /// Data pointer would leave the tape
    #[error("BoundaryError: cannot move {direction} from cell {position} (capacity {capacity})")]
    Boundary {
        /// Attempted direction
        direction: Direction,
        /// Data pointer before the move
        position: usize,
        /// Tape capacity
        capacity: usize,
    },

    /// Loop end with no open loop
    #[error("StackUnderflow: loop stack is empty on closing loop")]
    StackUnderflow,

    /// Input capability failed
    #[error("InputError: failed to read value: {0}")]
    Input(#[source] io::Error),

    /// Output capability failed
    #[error("OutputError: failed to write value: {0}")]
    Output(#[source] io::Error),

    /// Failure raised by a custom operator
    #[error("{0}")]
    Custom(String),
}

impl VmError {
    /// Create a boundary error
    pub fn boundary(direction: Direction, position: usize, capacity: usize) -> Self {
        Self::Boundary {
            direction,
            position,
            capacity,
        }
    }

    /// Create an error from a custom operator
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Whether this is a boundary violation
    pub fn is_boundary(&self) -> bool {
        matches!(self, Self::Boundary { .. })
    }

    /// Whether this is a loop stack underflow
    pub fn is_stack_underflow(&self) -> bool {
        matches!(self, Self::StackUnderflow)
    }

    /// Whether an input or output capability failed
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Input(_) | Self::Output(_))
    }
}

/// Result type for handler operations
pub type VmResult<T> = std::result::Result<T, VmError>;

/// Errors that end a run
///
/// Every variant carries the instruction pointer at the time of failure.
#[derive(Debug, Error)]
pub enum RunError {
    /// A handler failed
    #[error("failed to process [#cmd: {ip}]: {source}")]
    Instruction {
        /// Position of the failing instruction
        ip: usize,
        /// Handler error
        #[source]
        source: VmError,
    },

    /// The instruction source failed for a reason other than end-of-input
    #[error("failed to read command [#cmd: {ip}]: {source}")]
    SourceRead {
        /// Position that was being fetched
        ip: usize,
        /// Underlying read error
        #[source]
        source: io::Error,
    },

    /// The interrupt flag was raised
    #[error("execution interrupted [#cmd: {ip}]")]
    Interrupted {
        /// Position of the next instruction that would have run
        ip: usize,
    },
}

impl RunError {
    /// Instruction pointer the error is attributed to
    pub fn ip(&self) -> usize {
        match self {
            Self::Instruction { ip, .. } | Self::SourceRead { ip, .. } | Self::Interrupted { ip } => {
                *ip
            }
        }
    }

    /// Handler error, if the run failed inside a handler
    pub fn vm_error(&self) -> Option<&VmError> {
        match self {
            Self::Instruction { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Whether the run was interrupted from outside
    pub fn is_interrupted(&self) -> bool {
        matches!(self, Self::Interrupted { .. })
    }
}

/// Result type for runs
pub type RunResult<T> = std::result::Result<T, RunError>;
