use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jobly::{FieldNameMap, JobFilter, UpdatePayload, sql_for_partial_update};

/// A payload with `n` fields, every other one renamed by the map.
fn build_payload(n: usize) -> (UpdatePayload, FieldNameMap) {
    let mut payload = UpdatePayload::new();
    let mut names = FieldNameMap::new();
    for i in 0..n {
        payload.insert(format!("field{i}"), i as i64);
        if i % 2 == 0 {
            names = names.with(format!("field{i}"), format!("column_{i}"));
        }
    }
    (payload, names)
}

fn bench_partial_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_fragments/partial_update");

    for n in [1, 5, 10, 50] {
        let input = build_payload(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &input, |b, (payload, names)| {
            b.iter(|| black_box(sql_for_partial_update(payload, names)));
        });
    }

    group.finish();
}

fn bench_job_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("sql_fragments/job_filter");

    let cases = [
        ("empty", JobFilter::default()),
        ("salary", JobFilter::default().min_salary(50_000)),
        (
            "all",
            JobFilter::default()
                .min_salary(50_000)
                .has_equity(true)
                .title("engineer"),
        ),
    ];
    for (name, filter) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &filter, |b, filter| {
            b.iter(|| black_box(filter.where_clause()));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_partial_update, bench_job_filter);
criterion_main!(benches);
