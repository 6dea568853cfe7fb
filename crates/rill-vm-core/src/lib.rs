//! # Rill VM Core
//!
//! Streaming execution engine for the Rill instruction set.
//!
//! The instruction source is read strictly forward, one byte at a time, and
//! is never rewound. Loops still run any number of times: bytes consumed
//! inside a loop are kept in a replay cache keyed by instruction position,
//! and jumps back to a loop start are served from that cache.
//!
//! ```
//! use rill_vm_core::{CapturedOutput, EngineConfig, Interpreter, NoInput};
//!
//! let output = CapturedOutput::<i32>::new();
//! let mut vm = Interpreter::new(&EngineConfig::default(), NoInput, output.clone());
//! let memory = vm.run("+++[>+++<-]>.".as_bytes()).unwrap();
//! assert_eq!(memory[1], 9);
//! assert_eq!(output.values(), vec![9]);
//! ```

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod cache;
pub mod cell;
pub mod config;
pub mod context;
pub mod error;
pub mod interpreter;
pub mod io;
pub mod memory;
pub mod operators;
pub mod stack;
pub mod stats;

pub use cache::InstructionCache;
pub use cell::{Cell, DefaultCell};
pub use config::{ConfigError, EngineConfig};
pub use context::VmContext;
pub use error::{Direction, RunError, RunResult, VmError, VmResult};
pub use interpreter::Interpreter;
pub use io::{
    CapturedOutput, InputReader, InstructionSource, NoInput, NullOutput, OutputWriter,
    ReadSource, ScriptedInput,
};
pub use memory::{DEFAULT_MEMORY_SIZE, Memory};
pub use operators::{Operator, OperatorTable};
pub use rill_vm_bytecode::Opcode;
pub use stack::{LoopStack, Stack};
pub use stats::RunStats;
