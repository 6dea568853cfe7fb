//! Per-run statistics

use std::collections::BTreeMap;

use rill_vm_bytecode::Opcode;
use serde::Serialize;

use crate::cell::Cell;
use crate::context::VmContext;

/// Counters collected during a single run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    /// Instructions handed to a handler
    pub instructions_dispatched: u64,
    /// Bytes pulled from the instruction source
    pub stream_reads: u64,
    /// Bytes served from the replay cache
    pub cache_hits: u64,
    /// Bytes passed over while skipping a loop body
    pub skipped: u64,
    /// Deepest loop nesting reached
    pub peak_loop_depth: usize,
    /// Largest replay cache span
    pub peak_cache_len: usize,
    /// Dispatches per baseline instruction byte
    pub opcodes: BTreeMap<Opcode, u64>,
}

impl RunStats {
    #[inline]
    pub(crate) fn record_dispatch(&mut self, byte: u8) {
        self.instructions_dispatched += 1;
        if let Some(opcode) = Opcode::from_byte(byte) {
            *self.opcodes.entry(opcode).or_default() += 1;
        }
    }

    #[inline]
    pub(crate) fn record_stream_read(&mut self) {
        self.stream_reads += 1;
    }

    #[inline]
    pub(crate) fn record_cache_hit(&mut self) {
        self.cache_hits += 1;
    }

    #[inline]
    pub(crate) fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Update the high-water marks from the context
    #[inline]
    pub(crate) fn observe<C: Cell>(&mut self, ctx: &VmContext<C>) {
        self.peak_loop_depth = self.peak_loop_depth.max(ctx.loop_depth());
        self.peak_cache_len = self.peak_cache_len.max(ctx.cached_len());
    }

    /// Bytes fetched from either the stream or the cache
    pub fn fetched(&self) -> u64 {
        self.stream_reads + self.cache_hits
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let mut stats = RunStats::default();
        stats.record_stream_read();
        stats.record_stream_read();
        stats.record_cache_hit();
        stats.record_dispatch(b'+');
        stats.record_dispatch(b'+');
        stats.record_dispatch(b'#');
        stats.record_skip();

        assert_eq!(stats.stream_reads, 2);
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.fetched(), 3);
        assert_eq!(stats.instructions_dispatched, 3);
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.opcodes.get(&Opcode::Increment), Some(&2));
        assert_eq!(stats.opcodes.len(), 1);
    }

    #[test]
    fn test_serialize_keys_opcodes_by_name() {
        let mut stats = RunStats::default();
        stats.record_dispatch(b'[');
        stats.record_dispatch(b'.');
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["instructions_dispatched"], 2);
        assert_eq!(json["opcodes"]["Output"], 1);
        assert_eq!(json["opcodes"]["LoopStart"], 1);
    }
}
