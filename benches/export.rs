// SPDX-FileCopyrightText: 2026 Piste Contributors
// SPDX-License-Identifier: MIT

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use piste::format::export_csv;
use piste::model::{BoutId, Session, Tag, TagDraft, TagId};

fn fixture_sessions(session_count: usize, tags_per_session: usize) -> Vec<Session> {
    (0..session_count)
        .map(|s| {
            let mut session = Session::new(
                BoutId::generate(),
                format!("bout-{s:03}.mp4"),
                1_700_000_000_000,
            );
            session.set_left_fencer(Some("Left, \"the wall\"".to_owned()));
            session.set_right_fencer(Some("Right".to_owned()));
            for t in 0..tags_per_session {
                session.tags_mut().push(Tag::new(
                    TagId::generate(),
                    1_700_000_000_000,
                    TagDraft::new("counter-attack into preparation, blade taken", t as f64 * 2.3),
                ));
            }
            session
        })
        .collect()
}

// Benchmark identity (keep stable):
// - Group name in this file: `export.csv`
// - Case IDs (the string after the `/`) must remain stable across refactors so
//   results stay comparable over time (e.g. `small`, `medium_quoted`).
fn benches_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export.csv");

    let small = fixture_sessions(4, 25);
    group.bench_function("small", |b| {
        b.iter(|| {
            let csv = export_csv(black_box(&small));
            black_box(csv.len())
        });
    });

    let medium = fixture_sessions(40, 100);
    group.bench_function("medium_quoted", |b| {
        b.iter(|| {
            let csv = export_csv(black_box(&medium));
            black_box(csv.len())
        });
    });

    group.finish();
}

criterion_group!(benches, benches_export);
criterion_main!(benches);
