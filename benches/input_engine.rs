//! Benchmarks for the modal input engine.
//!
//! These benchmarks measure key resolution: single-key commands, buffered
//! multi-key sequences, counts and discarded input.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use taskdeck::input::{ModalInputEngine, Modifiers};

fn bench_single_key(c: &mut Criterion) {
    let mut engine = ModalInputEngine::new();
    c.bench_function("resolve_single_key", |b| {
        b.iter(|| engine.process_key(black_box("j"), Modifiers::NONE))
    });
}

fn bench_sequence(c: &mut Criterion) {
    let mut engine = ModalInputEngine::new();
    c.bench_function("resolve_two_key_sequence", |b| {
        b.iter(|| {
            engine.process_key(black_box("g"), Modifiers::NONE);
            engine.process_key(black_box("g"), Modifiers::NONE)
        })
    });
}

fn bench_count(c: &mut Criterion) {
    let mut engine = ModalInputEngine::new();
    c.bench_function("resolve_counted_motion", |b| {
        b.iter(|| {
            engine.process_key(black_box("1"), Modifiers::NONE);
            engine.process_key(black_box("2"), Modifiers::NONE);
            engine.process_key(black_box("j"), Modifiers::NONE)
        })
    });
}

fn bench_discard(c: &mut Criterion) {
    let mut engine = ModalInputEngine::new();
    c.bench_function("discard_unmatched_key", |b| {
        b.iter(|| engine.process_key(black_box("z"), Modifiers::NONE))
    });
}

fn bench_keybinding_help(c: &mut Criterion) {
    let engine = ModalInputEngine::new();
    c.bench_function("keybinding_help", |b| b.iter(|| engine.keybinding_help()));
}

criterion_group!(
    benches,
    bench_single_key,
    bench_sequence,
    bench_count,
    bench_discard,
    bench_keybinding_help
);
criterion_main!(benches);
