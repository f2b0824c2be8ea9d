//! Benchmarks for search ranking and text sanitization.
//!
//! These benchmarks measure ranking a full task list against short and empty
//! queries, and sanitizing hostile task text.

use chrono::Utc;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use fake::{Fake, Faker};
use taskdeck::tasks::{rank, Task, MAX_TASKS};
use taskdeck::utils::text_processing::{sanitize_text, DEFAULT_MAX_LENGTH};

fn tasks() -> Vec<Task> {
    (0..MAX_TASKS)
        .map(|i| {
            let mut task = Task::new(&format!("task-{}", i), &Faker.fake::<String>());
            task.description = Faker.fake::<String>();
            task.labels = vec!["backend".to_string(), Faker.fake::<String>()];
            task
        })
        .collect()
}

fn bench_rank_query(c: &mut Criterion) {
    let tasks = tasks();
    let now = Utc::now();
    c.bench_function("rank_1000_tasks", |b| {
        b.iter(|| rank(black_box(&tasks), black_box("back"), now))
    });
}

fn bench_rank_empty_query(c: &mut Criterion) {
    let tasks = tasks();
    let now = Utc::now();
    c.bench_function("rank_1000_tasks_empty_query", |b| {
        b.iter(|| rank(black_box(&tasks), black_box(""), now))
    });
}

fn bench_sanitize(c: &mut Criterion) {
    let text = "\x1b[31mred\x1b[0m title with \x1b]0;title\x07 and \u{202e}bidi\n".repeat(20);
    c.bench_function("sanitize_escaped_text", |b| {
        b.iter(|| sanitize_text(black_box(&text), DEFAULT_MAX_LENGTH))
    });
}

criterion_group!(
    benches,
    bench_rank_query,
    bench_rank_empty_query,
    bench_sanitize
);
criterion_main!(benches);
