use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use pgfrag::{ColumnMap, FilterOp, FilterSpec, FilterValues, UpdateData};

/// Build update data with `n` fields.
fn build_update(n: usize) -> UpdateData {
    let mut data = UpdateData::new();
    for i in 0..n {
        data = data.set(&format!("field{i}"), i as i64);
    }
    data
}

fn bench_set_clause(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragments/set_clause");

    let columns = ColumnMap::new().map("field0", "col0");
    for n in [1, 5, 10, 50] {
        let data = build_update(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &data, |b, data| {
            b.iter(|| black_box(data.build(&columns).unwrap()));
        });
    }

    group.finish();
}

fn bench_where_clause(c: &mut Criterion) {
    let mut group = c.benchmark_group("fragments/where_clause");

    for n in [1, 5, 10, 50] {
        let mut spec = FilterSpec::new();
        let mut values = FilterValues::new();
        for i in 0..n {
            let key = format!("min{i}");
            spec = spec.rule(&key, FilterOp::RangeMin, &format!("col{i}"));
            values = values.set(&key, i as i64);
        }
        group.bench_with_input(
            BenchmarkId::from_parameter(n),
            &(spec, values),
            |b, (spec, values)| {
                b.iter(|| black_box(spec.build(values).unwrap()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_set_clause, bench_where_clause);
criterion_main!(benches);
