//! # Rill VM Bytecode
//!
//! The instruction set of the Rill streaming VM.
//!
//! Every instruction is a single byte. Eight bytes form the baseline set;
//! any other byte is a no-op unless a custom operator is registered for it.

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod error;
pub mod instruction;

pub use error::BytecodeError;
pub use instruction::{LOOP_END, LOOP_START, Opcode, is_loop_marker};
