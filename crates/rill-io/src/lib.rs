//! # Rill IO
//!
//! Concrete capability providers for the Rill VM: instruction sources backed
//! by files or stdin, input readers over bytes or prompted lines, and output
//! writers that format cell values onto any [`std::io::Write`].

#![warn(clippy::all)]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod input;
pub mod output;
pub mod source;

pub use input::{ByteInput, PromptInput};
pub use output::{OutputFormat, ValueWriter};
pub use source::{FileSource, StdinSource, open_program, stdin_program};
