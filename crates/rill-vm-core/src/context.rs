//! VM execution context
//!
//! The context holds per-run state: memory, both pointers, the loop stack,
//! the replay cache and the I/O capabilities. Operators receive it by
//! exclusive reference.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::cache::InstructionCache;
use crate::cell::Cell;
use crate::error::{VmError, VmResult};
use crate::io::{InputReader, OutputWriter};
use crate::memory::Memory;
use crate::stack::LoopStack;

/// VM execution context
pub struct VmContext<C: Cell> {
    /// Cell tape with the data pointer
    memory: Memory<C>,
    /// Position of the instruction being executed
    ip: usize,
    /// Start positions of open loops
    pub(crate) loops: LoopStack,
    /// Replay buffer, present while a loop is open
    pub(crate) cache: Option<InstructionCache>,
    /// Position of the most recently executed loop end
    pub(crate) pending_loop_end: Option<usize>,
    /// Set by loop start when a never-entered body must be skipped
    pub(crate) skip_requested: bool,
    /// Prefix for input prompts
    input_hint: String,
    input: Box<dyn InputReader<C>>,
    output: Box<dyn OutputWriter<C>>,
}

impl<C: Cell> VmContext<C> {
    /// Create a context with a zeroed tape of `memory_size` cells
    pub fn new(
        memory_size: NonZeroUsize,
        input_hint: impl Into<String>,
        input: Box<dyn InputReader<C>>,
        output: Box<dyn OutputWriter<C>>,
    ) -> Self {
        Self {
            memory: Memory::new(memory_size),
            ip: 0,
            loops: LoopStack::new(),
            cache: None,
            pending_loop_end: None,
            skip_requested: false,
            input_hint: input_hint.into(),
            input,
            output,
        }
    }

    /// Reset per-run state; memory contents are kept
    pub(crate) fn reset(&mut self) {
        self.ip = 0;
        self.memory.reset_pointer();
        self.loops.clear();
        self.cache = None;
        self.pending_loop_end = None;
        self.skip_requested = false;
    }

    /// Memory tape
    #[inline]
    pub fn memory(&self) -> &Memory<C> {
        &self.memory
    }

    /// Memory tape, mutably
    #[inline]
    pub fn memory_mut(&mut self) -> &mut Memory<C> {
        &mut self.memory
    }

    /// Current data pointer
    #[inline]
    pub fn data_pointer(&self) -> usize {
        self.memory.pointer()
    }

    /// Move the data pointer to `position`
    pub fn set_data_pointer(&mut self, position: usize) -> VmResult<()> {
        self.memory.set_pointer(position)
    }

    /// Position of the instruction being executed
    #[inline]
    pub fn instruction_pointer(&self) -> usize {
        self.ip
    }

    /// Redirect control flow
    ///
    /// The interpreter advances the pointer by one after every handler, so
    /// set it to one less than the next instruction that should run
    /// (`usize::MAX` for position 0).
    #[inline]
    pub fn set_instruction_pointer(&mut self, ip: usize) {
        self.ip = ip;
    }

    /// Step to the next instruction; wraps so a jump target of `0 - 1`
    /// lands on 0
    #[inline]
    pub(crate) fn advance(&mut self) {
        self.ip = self.ip.wrapping_add(1);
    }

    /// Value of the current cell
    #[inline]
    pub fn current_cell(&self) -> C {
        self.memory.get()
    }

    /// Overwrite the current cell
    #[inline]
    pub fn set_current_cell(&mut self, value: C) {
        self.memory.set(value);
    }

    /// Number of open loops
    #[inline]
    pub fn loop_depth(&self) -> usize {
        self.loops.len()
    }

    /// Number of positions currently held by the replay cache
    pub fn cached_len(&self) -> usize {
        self.cache.as_ref().map_or(0, InstructionCache::len)
    }

    /// Prompt text for an input read at the current instruction
    pub fn input_prompt(&self) -> String {
        format!("{} [#cmd: {}]", self.input_hint, self.ip)
    }

    /// Read one value from the input capability
    pub fn read_input(&mut self, hint: &str) -> VmResult<C> {
        self.input.read(hint).map_err(VmError::Input)
    }

    /// Emit one value through the output capability
    pub fn write_output(&mut self, value: C) -> VmResult<()> {
        self.output.write(value).map_err(VmError::Output)
    }

    pub(crate) fn flush_output(&mut self) -> VmResult<()> {
        self.output.flush().map_err(VmError::Output)
    }

    /// Cached byte for the current position
    #[inline]
    pub(crate) fn cached_instruction(&self) -> Option<u8> {
        self.cache.as_ref()?.get(self.ip)
    }

    /// Start the replay cache at the current position if none exists
    pub(crate) fn ensure_cache(&mut self) {
        if self.cache.is_none() {
            debug!(base = self.ip, "instruction cache created");
            self.cache = Some(InstructionCache::new(self.ip));
        }
    }

    /// Record `byte` at the current position while the cache is live
    #[inline]
    pub(crate) fn record(&mut self, byte: u8) {
        if let Some(cache) = self.cache.as_mut() {
            cache.record(self.ip, byte);
        }
    }

    /// Drop the cache once every loop has closed
    pub(crate) fn release_cache_if_idle(&mut self) {
        if !self.loops.is_empty() {
            return;
        }
        if let Some(cache) = self.cache.take() {
            debug!(
                base = cache.base(),
                len = cache.len(),
                "instruction cache discarded"
            );
        }
    }
}

impl<C: Cell> std::fmt::Debug for VmContext<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VmContext")
            .field("ip", &self.ip)
            .field("data_pointer", &self.memory.pointer())
            .field("capacity", &self.memory.capacity())
            .field("loops", &self.loops)
            .field("cached_len", &self.cached_len())
            .field("pending_loop_end", &self.pending_loop_end)
            .finish_non_exhaustive()
    }
}
