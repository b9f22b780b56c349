// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use piste::model::TagDraft;
use piste::store::SessionStore;

fn populated_store(session_count: usize, tags_per_session: usize) -> SessionStore {
    let store = SessionStore::in_memory();
    for s in 0..session_count {
        let file_name = format!("bout-{s:03}.mp4");
        for t in 0..tags_per_session {
            store.add_tag(&file_name, TagDraft::new("bench tag", t as f64 * 1.5));
        }
    }
    store
}

// Benchmark identity (keep stable):
// - Group name in this file: `store.mutations`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `add_tag_small`, `reload_medium`).
fn benches_store(c: &mut Criterion) {
    let mut group = c.benchmark_group("store.mutations");

    group.bench_function("add_tag_small", |b| {
        b.iter_batched(
            || populated_store(4, 25),
            |store| {
                store.add_tag(black_box("bout-000.mp4"), TagDraft::new("touch", 42.0));
                store
            },
            BatchSize::SmallInput,
        );
    });

    group.bench_function("add_tag_medium", |b| {
        b.iter_batched(
            || populated_store(40, 100),
            |store| {
                store.add_tag(black_box("bout-020.mp4"), TagDraft::new("touch", 42.0));
                store
            },
            BatchSize::LargeInput,
        );
    });

    group.bench_function("delete_session_medium", |b| {
        b.iter_batched(
            || populated_store(40, 100),
            |store| {
                store.delete_session(black_box("bout-020.mp4"));
                store
            },
            BatchSize::LargeInput,
        );
    });

    group.finish();
}

criterion_group!(benches, benches_store);
criterion_main!(benches);
