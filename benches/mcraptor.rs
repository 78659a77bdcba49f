use std::hint::black_box;
use criterion::{criterion_group, criterion_main, Criterion};

use dev_utils::{build_example_timetable, get_example_query};
use mcraptor::run_query;

fn mc_raptor_benchmark(c: &mut Criterion) {
    let (timetable, footpaths, source, destination) = build_example_timetable(8, 6, 12);
    let query = get_example_query(source, destination);
    c.bench_function("mcraptor_query", |b| b.iter(|| run_query(black_box(&timetable), black_box(&footpaths), black_box(&query))));
}

criterion_group!(benches, mc_raptor_benchmark);
criterion_main!(benches);
