//! Loop Replay Benchmarks
//!
//! Measures dispatch speed for programs whose time is spent replaying loop
//! bodies from the instruction cache.

use criterion::{Criterion, criterion_group, criterion_main};
use rill_vm_core::{EngineConfig, Interpreter, NoInput, NullOutput};
use std::hint::black_box;

fn interpreter() -> Interpreter<i32> {
    Interpreter::new(&EngineConfig::default().with_memory_size(16), NoInput, NullOutput)
}

/// Benchmark: one loop counting a cell down from 255
fn bench_countdown(c: &mut Criterion) {
    let program = "[-]";
    let mut vm = interpreter();

    c.bench_function("countdown_loop", |b| {
        b.iter(|| {
            vm.context_mut().set_current_cell(255);
            black_box(vm.run(black_box(program.as_bytes())).unwrap()[0])
        })
    });
}

/// Benchmark: nested multiplication, 64 * 64 iterations
fn bench_nested_multiply(c: &mut Criterion) {
    // cell0 = 64, cell1 += 64 per outer pass via an inner copy loop
    let program = "+".repeat(64) + "[>" + &"+".repeat(64) + "[>+<-]<-]";
    let mut vm = interpreter();

    c.bench_function("nested_multiply", |b| {
        b.iter(|| {
            vm.context_mut().memory_mut().cells_mut().fill(0);
            black_box(vm.run(black_box(program.as_bytes())).unwrap()[2])
        })
    });
}

/// Benchmark: straight-line code with no loops, read once from the stream
fn bench_straight_line(c: &mut Criterion) {
    let program = "+>".repeat(8) + &"<-".repeat(8);
    let mut vm = interpreter();

    c.bench_function("straight_line", |b| {
        b.iter(|| black_box(vm.run(black_box(program.as_bytes())).unwrap()[0]))
    });
}

criterion_group!(
    benches,
    bench_countdown,
    bench_nested_multiply,
    bench_straight_line
);
criterion_main!(benches);
