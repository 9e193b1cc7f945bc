//! Record benchmarks: diff-and-merge, encoding and event dispatch.

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nbdb_core::{
    Callback, FieldDef, FieldType, ModelBuilder, ModelClass, Record, ScalarType, Value, UPDATED,
};

fn wide_model(fields: usize) -> Arc<ModelClass> {
    ModelBuilder::new("Wide")
        .fields((0..fields).map(|i| {
            FieldDef::optional(format!("f{i}"), FieldType::scalar(ScalarType::Int))
        }))
        .event(UPDATED)
        .build()
        .unwrap()
}

fn populated(class: &Arc<ModelClass>, fields: usize, offset: i64) -> Record {
    Record::new(
        class,
        (0..fields).map(|i| (format!("f{i}"), Value::Int(i as i64 + offset))),
    )
    .unwrap()
}

fn bench_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("record/update");

    for fields in [8usize, 64, 256] {
        let class = wide_model(fields);
        let current = populated(&class, fields, 0);

        // Sparse: the incoming record touches a single field.
        let sparse = Record::new(&class, [("f0", 1_000)]).unwrap();
        group.bench_with_input(BenchmarkId::new("sparse", fields), &fields, |b, _| {
            b.iter_batched(
                || current.clone(),
                |mut record| black_box(record.update(&sparse).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });

        // Full: every field is set and every field differs.
        let full = populated(&class, fields, 1);
        group.bench_with_input(BenchmarkId::new("full", fields), &fields, |b, _| {
            b.iter_batched(
                || current.clone(),
                |mut record| black_box(record.update(&full).unwrap()),
                criterion::BatchSize::SmallInput,
            );
        });
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("record/json");
    let class = wide_model(64);
    let record = populated(&class, 64, 0);
    let mut with_id = record.clone();
    with_id.set("id", "r1").unwrap();
    let text = with_id.to_json().unwrap();

    group.bench_function("encode_64", |b| {
        b.iter(|| black_box(with_id.to_json().unwrap()));
    });
    group.bench_function("decode_64", |b| {
        b.iter(|| black_box(Record::from_json(&class, black_box(&text)).unwrap()));
    });

    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let mut group = c.benchmark_group("event/emit");

    for subscribers in [1usize, 16] {
        let class = wide_model(4);
        for i in 0..subscribers {
            class
                .register(UPDATED, Callback::new(format!("sub{i}"), |record, _| {
                    black_box(record.id());
                    Ok(())
                }))
                .unwrap();
        }
        let record = populated(&class, 4, 0);

        group.bench_with_input(
            BenchmarkId::from_parameter(subscribers),
            &subscribers,
            |b, _| {
                b.iter(|| record.emit(UPDATED, &[]).unwrap());
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_update, bench_codec, bench_emit);
criterion_main!(benches);
