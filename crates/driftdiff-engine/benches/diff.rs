use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use driftdiff_engine::{DiffEngine, DiffOptions};

fn sample_texts() -> (String, String) {
    let mut old = String::new();
    let mut new = String::new();
    for i in 0..60 {
        old.push_str(&format!(
            "Section {i} keeps some stable wiki text with a [[link {i}]] inside.\n"
        ));
        if i % 7 == 3 {
            new.push_str(&format!(
                "Section {i} keeps rewritten wiki text with a [[link {i}]] inside.\n"
            ));
        } else {
            new.push_str(&format!(
                "Section {i} keeps some stable wiki text with a [[link {i}]] inside.\n"
            ));
        }
        if i % 11 == 5 {
            old.push('\n');
            new.push('\n');
        }
    }
    // Move one paragraph to the front.
    let moved = "Closing remarks paragraph that travels to the top.\n\n";
    old.push_str(moved);
    (old, format!("{moved}{new}"))
}

fn bench_diff(c: &mut Criterion) {
    let (old, new) = sample_texts();
    let engine = DiffEngine::with_defaults();
    c.bench_function("diff_with_char_refinement", |b| {
        b.iter(|| engine.diff(black_box(&old), black_box(&new)).unwrap())
    });

    let word_engine = DiffEngine::new(DiffOptions {
        char_diff: false,
        ..DiffOptions::default()
    })
    .unwrap();
    c.bench_function("diff_word_level_only", |b| {
        b.iter(|| word_engine.diff(black_box(&old), black_box(&new)).unwrap())
    });
}

criterion_group!(benches, bench_diff);
criterion_main!(benches);
