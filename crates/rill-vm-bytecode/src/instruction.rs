//! Baseline instructions (opcodes)

use std::fmt;

use serde::Serialize;

use crate::error::{BytecodeError, Result};

/// Loop-start marker byte
pub const LOOP_START: u8 = b'[';

/// Loop-end marker byte
pub const LOOP_END: u8 = b']';

/// Baseline opcodes
///
/// The discriminant of each variant is the byte that encodes it in an
/// instruction stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[repr(u8)]
pub enum Opcode {
    // ==================== Pointer ====================
    /// Move the data pointer one cell right
    MoveRight = b'>',
    /// Move the data pointer one cell left
    MoveLeft = b'<',

    // ==================== Cell ====================
    /// Increment the current cell (wrapping)
    Increment = b'+',
    /// Decrement the current cell (wrapping)
    Decrement = b'-',

    // ==================== I/O ====================
    /// Emit the current cell through the output capability
    Output = b'.',
    /// Read a value from the input capability into the current cell
    Input = b',',

    // ==================== Control ====================
    /// Open a loop: skip the body while the current cell is zero
    LoopStart = b'[',
    /// Close a loop: jump back to the matching loop start
    LoopEnd = b']',
}

impl Opcode {
    /// All baseline opcodes, in table order
    pub const ALL: [Opcode; 8] = [
        Opcode::MoveRight,
        Opcode::MoveLeft,
        Opcode::Increment,
        Opcode::Decrement,
        Opcode::Output,
        Opcode::Input,
        Opcode::LoopStart,
        Opcode::LoopEnd,
    ];

    /// Decode a byte, returning `None` for anything outside the baseline set
    #[inline]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            b'>' => Some(Self::MoveRight),
            b'<' => Some(Self::MoveLeft),
            b'+' => Some(Self::Increment),
            b'-' => Some(Self::Decrement),
            b'.' => Some(Self::Output),
            b',' => Some(Self::Input),
            b'[' => Some(Self::LoopStart),
            b']' => Some(Self::LoopEnd),
            _ => None,
        }
    }

    /// The byte encoding this opcode
    #[inline]
    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Whether this opcode takes part in loop-bracket matching
    #[inline]
    pub const fn is_loop_marker(self) -> bool {
        matches!(self, Self::LoopStart | Self::LoopEnd)
    }

    /// Human-readable name
    pub const fn name(self) -> &'static str {
        match self {
            Self::MoveRight => "move-right",
            Self::MoveLeft => "move-left",
            Self::Increment => "increment",
            Self::Decrement => "decrement",
            Self::Output => "output",
            Self::Input => "input",
            Self::LoopStart => "loop-start",
            Self::LoopEnd => "loop-end",
        }
    }
}

/// Whether `byte` is one of the two protected loop markers
#[inline]
pub const fn is_loop_marker(byte: u8) -> bool {
    byte == LOOP_START || byte == LOOP_END
}

impl TryFrom<u8> for Opcode {
    type Error = BytecodeError;

    fn try_from(byte: u8) -> Result<Self> {
        Self::from_byte(byte).ok_or(BytecodeError::InvalidOpcode(byte))
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> Self {
        op.as_byte()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.name(), self.as_byte() as char)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_baseline_bytes() {
        assert_eq!(Opcode::MoveRight.as_byte(), b'>');
        assert_eq!(Opcode::MoveLeft.as_byte(), b'<');
        assert_eq!(Opcode::Increment.as_byte(), b'+');
        assert_eq!(Opcode::Decrement.as_byte(), b'-');
        assert_eq!(Opcode::Output.as_byte(), b'.');
        assert_eq!(Opcode::Input.as_byte(), b',');
        assert_eq!(Opcode::LoopStart.as_byte(), LOOP_START);
        assert_eq!(Opcode::LoopEnd.as_byte(), LOOP_END);
    }

    #[test]
    fn test_decode_every_baseline_opcode() {
        for op in Opcode::ALL {
            assert_eq!(Opcode::from_byte(op.as_byte()), Some(op));
            assert_eq!(Opcode::try_from(op.as_byte()), Ok(op));
        }
    }

    #[test]
    fn test_unknown_bytes_are_not_opcodes() {
        for byte in [b' ', b'\n', b'a', b'{', 0u8, 0xff] {
            assert_eq!(Opcode::from_byte(byte), None);
            assert_eq!(
                Opcode::try_from(byte),
                Err(BytecodeError::InvalidOpcode(byte))
            );
        }
    }

    #[test]
    fn test_loop_markers() {
        let markers: Vec<_> = Opcode::ALL
            .into_iter()
            .filter(|op| op.is_loop_marker())
            .collect();
        assert_eq!(markers, vec![Opcode::LoopStart, Opcode::LoopEnd]);
        assert!(is_loop_marker(b'['));
        assert!(is_loop_marker(b']'));
        assert!(!is_loop_marker(b'+'));
    }

    #[test]
    fn test_display() {
        assert_eq!(Opcode::LoopStart.to_string(), "loop-start '['");
        assert_eq!(
            BytecodeError::InvalidOpcode(b'x').to_string(),
            "Invalid opcode: 0x78"
        );
    }

    #[test]
    fn test_serde() {
        let json = serde_json::to_string(&Opcode::Output).unwrap();
        assert_eq!(json, "\"Output\"");
        assert!(Opcode::MoveRight < Opcode::LoopEnd);
    }
}
