//! Streaming interpreter
//!
//! Executes instructions straight from a forward-only source. Bytes consumed
//! while a loop is open are kept in the context's replay cache, so jumping
//! back to a loop start replays them from the cache instead of asking the
//! source again. The cache is dropped once the outermost loop closes.

use std::io::Read;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use rill_vm_bytecode::{LOOP_END, LOOP_START};
use tracing::{debug, trace, warn};

use crate::cell::{Cell, DefaultCell};
use crate::config::EngineConfig;
use crate::context::VmContext;
use crate::error::{RunError, RunResult, VmResult};
use crate::io::{InputReader, InstructionSource, OutputWriter, ReadSource};
use crate::operators::OperatorTable;
use crate::stats::RunStats;

/// The streaming interpreter
pub struct Interpreter<C: Cell = DefaultCell> {
    ctx: VmContext<C>,
    operators: OperatorTable<C>,
    /// Interrupt flag for external cancellation
    interrupt_flag: Arc<AtomicBool>,
    stats: RunStats,
}

impl<C: Cell> Interpreter<C> {
    /// Create an interpreter with the baseline instruction set
    pub fn new(
        config: &EngineConfig,
        input: impl InputReader<C> + 'static,
        output: impl OutputWriter<C> + 'static,
    ) -> Self {
        Self::with_operators(config, OperatorTable::new(), input, output)
    }

    /// Create an interpreter around an existing operator table
    pub fn with_operators(
        config: &EngineConfig,
        operators: OperatorTable<C>,
        input: impl InputReader<C> + 'static,
        output: impl OutputWriter<C> + 'static,
    ) -> Self {
        Self {
            ctx: VmContext::new(
                config.memory_capacity(),
                config.input_hint.clone(),
                Box::new(input),
                Box::new(output),
            ),
            operators,
            interrupt_flag: Arc::new(AtomicBool::new(false)),
            stats: RunStats::default(),
        }
    }

    /// Add or replace the handler for `byte`
    ///
    /// Loop markers cannot be replaced; for them this returns `false`.
    pub fn register_operator<F>(&mut self, byte: u8, handler: F) -> bool
    where
        F: Fn(&mut VmContext<C>) -> VmResult<()> + Send + Sync + 'static,
    {
        self.operators.register(byte, handler)
    }

    /// Builder form of [`Interpreter::register_operator`]
    pub fn with_operator<F>(mut self, byte: u8, handler: F) -> Self
    where
        F: Fn(&mut VmContext<C>) -> VmResult<()> + Send + Sync + 'static,
    {
        self.register_operator(byte, handler);
        self
    }

    /// Registered operators
    pub fn operators(&self) -> &OperatorTable<C> {
        &self.operators
    }

    /// Execution context
    pub fn context(&self) -> &VmContext<C> {
        &self.ctx
    }

    /// Execution context, mutably; use to preload memory between runs
    pub fn context_mut(&mut self) -> &mut VmContext<C> {
        &mut self.ctx
    }

    /// Memory cells
    pub fn memory(&self) -> &[C] {
        self.ctx.memory().cells()
    }

    /// Current data pointer
    pub fn data_pointer(&self) -> usize {
        self.ctx.data_pointer()
    }

    /// Statistics of the last run
    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Get the interrupt flag for external timeout/cancellation
    ///
    /// Call `flag.store(true, Ordering::Relaxed)` to interrupt execution.
    /// The flag is checked before every instruction.
    pub fn interrupt_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt_flag)
    }

    /// Set a custom interrupt flag (for sharing across interpreters)
    pub fn set_interrupt_flag(&mut self, flag: Arc<AtomicBool>) {
        self.interrupt_flag = flag;
    }

    /// Check if execution was interrupted
    #[inline]
    pub fn is_interrupted(&self) -> bool {
        self.interrupt_flag.load(Ordering::Relaxed)
    }

    /// Request interruption of execution
    pub fn interrupt(&self) {
        self.interrupt_flag.store(true, Ordering::Relaxed);
    }

    /// Clear the interrupt flag
    pub fn clear_interrupt(&self) {
        self.interrupt_flag.store(false, Ordering::Relaxed);
    }

    /// Run a program read byte by byte from `program`
    pub fn run<R: Read>(&mut self, program: R) -> RunResult<&[C]> {
        self.run_source(ReadSource::new(program))
    }

    /// Run a program pulled from `source` until it is exhausted
    ///
    /// Both pointers start at 0; memory keeps whatever previous runs left in
    /// it. Returns the memory cells on clean end of input. Output is flushed
    /// on every exit; a run error takes precedence over a flush error.
    pub fn run_source<S: InstructionSource>(&mut self, mut source: S) -> RunResult<&[C]> {
        self.ctx.reset();
        self.stats = RunStats::default();
        debug!(capacity = self.ctx.memory().capacity(), "run started");

        let outcome = self.execute(&mut source);

        let ip = self.ctx.instruction_pointer();
        let flushed = self
            .ctx
            .flush_output()
            .map_err(|source| RunError::Instruction { ip, source });

        if let Err(err) = outcome {
            if let Err(flush_err) = flushed {
                warn!(error = %flush_err, "output flush failed after run error");
            }
            debug!(ip = err.ip(), error = %err, "run failed");
            return Err(err);
        }
        flushed?;

        debug!(
            ip,
            dispatched = self.stats.instructions_dispatched,
            stream_reads = self.stats.stream_reads,
            cache_hits = self.stats.cache_hits,
            "run finished"
        );
        Ok(self.ctx.memory().cells())
    }

    /// Dispatch loop; returns once the source is exhausted
    fn execute<S: InstructionSource>(&mut self, source: &mut S) -> RunResult<()> {
        loop {
            self.check_interrupt()?;
            let ip = self.ctx.instruction_pointer();

            let Some(byte) = self.fetch(source)? else {
                return Ok(());
            };

            if byte == LOOP_START {
                self.ctx.ensure_cache();
            }
            self.ctx.record(byte);

            // Bytes without a handler are comments.
            if let Some(op) = self.operators.get(byte) {
                self.stats.record_dispatch(byte);
                op(&mut self.ctx).map_err(|source| RunError::Instruction { ip, source })?;
            }

            self.stats.observe(&self.ctx);
            self.ctx.release_cache_if_idle();

            if std::mem::take(&mut self.ctx.skip_requested) && !self.skip_loop_body(source)? {
                return Ok(());
            }

            self.ctx.advance();
        }
    }

    /// Next byte at the instruction pointer, replayed from the cache when
    /// present and read from `source` otherwise
    fn fetch<S: InstructionSource>(&mut self, source: &mut S) -> RunResult<Option<u8>> {
        if let Some(byte) = self.ctx.cached_instruction() {
            self.stats.record_cache_hit();
            return Ok(Some(byte));
        }

        let ip = self.ctx.instruction_pointer();
        let byte = source
            .next_instruction()
            .map_err(|source| RunError::SourceRead { ip, source })?;
        if byte.is_some() {
            self.stats.record_stream_read();
        }
        Ok(byte)
    }

    /// Pass over a loop body whose guard was false on entry
    ///
    /// Leaves the instruction pointer on the matching loop end. Returns
    /// `false` if the source ran out first.
    fn skip_loop_body<S: InstructionSource>(&mut self, source: &mut S) -> RunResult<bool> {
        let start = self.ctx.instruction_pointer();
        let mut depth = 1usize;

        loop {
            self.ctx.advance();
            self.check_interrupt()?;

            let Some(byte) = self.fetch(source)? else {
                warn!(start, "instruction stream ended inside a skipped loop");
                return Ok(false);
            };
            self.ctx.record(byte);
            self.stats.record_skip();

            match byte {
                LOOP_START => depth += 1,
                LOOP_END => {
                    depth -= 1;
                    if depth == 0 {
                        trace!(start, end = self.ctx.instruction_pointer(), "loop body skipped");
                        return Ok(true);
                    }
                }
                _ => {}
            }
        }
    }

    #[inline]
    fn check_interrupt(&self) -> RunResult<()> {
        if self.is_interrupted() {
            return Err(RunError::Interrupted {
                ip: self.ctx.instruction_pointer(),
            });
        }
        Ok(())
    }
}

impl<C: Cell> std::fmt::Debug for Interpreter<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Interpreter")
            .field("ctx", &self.ctx)
            .field("operators", &self.operators)
            .field("interrupted", &self.is_interrupted())
            .finish()
    }
}
