use std::hint::black_box;

use recordtype::*;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

fn wide_schema(n: usize) -> Schema {
    let columns = (0..n).map(|i| {
        (
            vec![
                "public".to_string(),
                format!("table_{}", i % 10),
                format!("column_{i}"),
            ],
            ValueType::Long,
            DataType::new(SqlType::BigInt),
        )
    });
    Schema::from_columns(columns)
        .unwrap()
        .with_ambiguity_policy(IgnoreAmbiguity)
}

fn lookup_by_tier(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup by tier");
    for n in [10, 100, 1000] {
        let schema = wide_schema(n);
        let last = n - 1;
        let field = schema.field_at(last).unwrap().clone();
        let name = field.name().clone();
        let partial = format!("table_{}.column_{last}", last % 10);
        let simple = format!("column_{last}");

        group.bench_with_input(BenchmarkId::new("identity", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box(&field)))
        });
        group.bench_with_input(BenchmarkId::new("exact", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box(&name)))
        });
        group.bench_with_input(BenchmarkId::new("partial", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box(partial.as_str())))
        });
        group.bench_with_input(BenchmarkId::new("simple", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box(simple.as_str())))
        });
        group.bench_with_input(BenchmarkId::new("position", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box(last)))
        });
        group.bench_with_input(BenchmarkId::new("miss", n), &n, |b, _| {
            b.iter(|| schema.index_of(black_box("public.nowhere.nothing")))
        });
    }
    group.finish();
}

fn coercion(c: &mut Criterion) {
    let schema = wide_schema(100);
    c.bench_function("field_as widening", |b| {
        b.iter(|| schema.field_as(black_box("column_42"), &ValueType::Double))
    });
    c.bench_function("field_as rejected", |b| {
        b.iter(|| schema.field_as(black_box("column_42"), &ValueType::Date))
    });
}

fn definition(c: &mut Criterion) {
    let columns: Vec<_> = (0..100)
        .map(|i| serde_json::json!({ "name": format!("public.t.c{i}"), "type": "DECIMAL(10, 2)" }))
        .collect();
    let text = serde_json::json!({ "columns": columns }).to_string();
    c.bench_function("schema from json definition", |b| {
        b.iter(|| Schema::from_json_str(black_box(&text)).unwrap())
    });
}

criterion_group!(benches, lookup_by_tier, coercion, definition);
criterion_main!(benches);
