//! Parse and projection throughput.
//!
//! ```bash
//! cargo bench --bench standoff
//! ```

use bratkb::{validate, EntityTypes, KbProjector, StandoffParser};
use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};

/// Synthetic abstract with `n` protein mentions, one event per pair.
fn synthetic(n: usize) -> (String, String) {
    let mut text = String::new();
    let mut ann = String::new();
    for i in 0..n {
        let start = text.chars().count();
        let protein = format!("P{i}");
        text.push_str(&protein);
        text.push_str(" binds ");
        let trigger = start + protein.len() + 1;
        ann.push_str(&format!(
            "T{}\tProtein {} {}\t{}\n",
            2 * i + 1,
            start,
            start + protein.len(),
            protein
        ));
        ann.push_str(&format!(
            "T{}\tBinding {} {}\tbinds\n",
            2 * i + 2,
            trigger,
            trigger + 5
        ));
        ann.push_str(&format!(
            "E{}\tBinding:T{} Theme:T{}\n",
            i + 1,
            2 * i + 2,
            2 * i + 1
        ));
    }
    ann.push_str("*\tEquiv T1 T3\n");
    (text, ann)
}

fn bench_parse(c: &mut Criterion) {
    let (text, ann) = synthetic(200);
    let parser = StandoffParser::default();

    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(ann.len() as u64));
    group.bench_function("200_events", |b| {
        b.iter(|| parser.parse_str("bench", black_box(text.as_str()), black_box(&ann)))
    });
    group.finish();
}

fn bench_project(c: &mut Criterion) {
    let (text, ann) = synthetic(200);
    let doc = StandoffParser::default()
        .parse_str("bench", text, &ann)
        .expect("synthetic document parses");
    let projector = KbProjector::with_entity_types(EntityTypes::new(["Protein"]));

    c.bench_function("project/200_events", |b| {
        b.iter(|| projector.project_with_diagnostics(black_box(&doc)))
    });

    let kb = projector.project(&doc);
    c.bench_function("validate/200_events", |b| b.iter(|| validate(black_box(&kb))));
}

criterion_group!(benches, bench_parse, bench_project);
criterion_main!(benches);
