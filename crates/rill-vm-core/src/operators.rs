//! Operator table
//!
//! Maps instruction bytes to handlers. The eight baseline instructions are
//! installed on construction. Callers may add or replace handlers for any
//! byte except the loop markers, which drive the loop stack and the replay
//! cache and so stay fixed.

use std::fmt;
use std::sync::Arc;

use rill_vm_bytecode::{Opcode, is_loop_marker};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};

use crate::cell::Cell;
use crate::context::VmContext;
use crate::error::{VmError, VmResult};

/// Instruction handler
pub type Operator<C> = Arc<dyn Fn(&mut VmContext<C>) -> VmResult<()> + Send + Sync>;

/// Byte → handler registry
pub struct OperatorTable<C: Cell> {
    ops: FxHashMap<u8, Operator<C>>,
}

impl<C: Cell> OperatorTable<C> {
    /// Table with the baseline instruction set
    pub fn new() -> Self {
        let mut ops: FxHashMap<u8, Operator<C>> = FxHashMap::default();
        for opcode in Opcode::ALL {
            ops.insert(opcode.as_byte(), baseline(opcode));
        }
        Self { ops }
    }

    /// Install `handler` for `byte`
    ///
    /// Returns `false` and leaves the table unchanged when `byte` is a loop
    /// marker.
    pub fn register<F>(&mut self, byte: u8, handler: F) -> bool
    where
        F: Fn(&mut VmContext<C>) -> VmResult<()> + Send + Sync + 'static,
    {
        if is_loop_marker(byte) {
            debug!(byte = %(byte as char), "refusing to override loop marker");
            return false;
        }
        if let Ok(opcode) = Opcode::try_from(byte) {
            debug!(%opcode, "replacing baseline operator");
        }
        self.ops.insert(byte, Arc::new(handler));
        true
    }

    /// Handler for `byte`
    #[inline]
    pub fn get(&self, byte: u8) -> Option<&Operator<C>> {
        self.ops.get(&byte)
    }

    /// Whether `byte` has a handler
    #[inline]
    pub fn contains(&self, byte: u8) -> bool {
        self.ops.contains_key(&byte)
    }

    /// Number of registered bytes
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Whether the table has no handlers
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Registered bytes in ascending order
    pub fn bytes(&self) -> Vec<u8> {
        let mut bytes: Vec<u8> = self.ops.keys().copied().collect();
        bytes.sort_unstable();
        bytes
    }
}

impl<C: Cell> Default for OperatorTable<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Cell> Clone for OperatorTable<C> {
    fn clone(&self) -> Self {
        Self {
            ops: self.ops.clone(),
        }
    }
}

impl<C: Cell> fmt::Debug for OperatorTable<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes: String = self.bytes().into_iter().map(char::from).collect();
        f.debug_struct("OperatorTable")
            .field("bytes", &bytes)
            .finish()
    }
}

fn baseline<C: Cell>(opcode: Opcode) -> Operator<C> {
    match opcode {
        Opcode::MoveRight => Arc::new(op_move_right::<C>),
        Opcode::MoveLeft => Arc::new(op_move_left::<C>),
        Opcode::Increment => Arc::new(op_increment::<C>),
        Opcode::Decrement => Arc::new(op_decrement::<C>),
        Opcode::Output => Arc::new(op_output::<C>),
        Opcode::Input => Arc::new(op_input::<C>),
        Opcode::LoopStart => Arc::new(op_loop_start::<C>),
        Opcode::LoopEnd => Arc::new(op_loop_end::<C>),
    }
}

fn op_move_right<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    ctx.memory_mut().move_right()
}

fn op_move_left<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    ctx.memory_mut().move_left()
}

fn op_increment<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    ctx.memory_mut().increment();
    Ok(())
}

fn op_decrement<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    ctx.memory_mut().decrement();
    Ok(())
}

fn op_output<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    let value = ctx.current_cell();
    ctx.write_output(value)
}

fn op_input<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    let hint = ctx.input_prompt();
    let value = ctx.read_input(&hint)?;
    ctx.set_current_cell(value);
    Ok(())
}

fn op_loop_start<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    let ip = ctx.instruction_pointer();

    // Back from the loop end: the loop is already on top.
    let reentry = ctx.loops.peek() == Some(&ip);
    if !reentry {
        ctx.loops.push(ip);
    }

    if ctx.current_cell() != C::zero() {
        return Ok(());
    }

    ctx.loops.pop();
    match ctx.pending_loop_end.take() {
        Some(end) if reentry => {
            trace!(start = ip, end, "loop guard false, leaving loop");
            // advance() lands just past the loop end
            ctx.set_instruction_pointer(end);
        }
        _ => {
            // Never reached the loop end, so its position is unknown yet.
            trace!(start = ip, "loop guard false on entry, skipping body");
            ctx.skip_requested = true;
        }
    }
    Ok(())
}

fn op_loop_end<C: Cell>(ctx: &mut VmContext<C>) -> VmResult<()> {
    let Some(&start) = ctx.loops.peek() else {
        return Err(VmError::StackUnderflow);
    };
    ctx.pending_loop_end = Some(ctx.instruction_pointer());
    // advance() re-enters the loop start
    ctx.set_instruction_pointer(start.wrapping_sub(1));
    Ok(())
}
