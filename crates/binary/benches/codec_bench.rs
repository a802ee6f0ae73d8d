//! Benchmarks for parameter, array and numeric encoding.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use pqbin_binary::{ArrayDecoder, ArrayEncoder, ParameterBuffer, TypeRegistry, Value};
use pqbin_core::DataType;
use pqbin_numeric::{decode_wire, NumericVar};

fn numeric_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("numeric");
    let text = "-123456789012345678.000123456789";
    let var: NumericVar = text.parse().unwrap();
    let wire = var.to_wire().unwrap();

    group.bench_function("parse", |b| {
        b.iter(|| black_box(text).parse::<NumericVar>().unwrap())
    });
    group.bench_function("to_text", |b| b.iter(|| black_box(&var).to_text()));
    group.bench_function("encode_wire", |b| b.iter(|| black_box(&var).to_wire().unwrap()));
    group.bench_function("decode_wire", |b| b.iter(|| decode_wire(black_box(&wire)).unwrap()));
    group.finish();
}

fn parameter_buffer_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parameter_buffer");

    for count in [8usize, 64, 512].iter() {
        let values: Vec<Value> = (0..*count)
            .map(|i| match i % 3 {
                0 => Value::Int8(i as i64),
                1 => Value::Text(format!("value-{}", i)),
                _ => Value::Float8(i as f64 * 0.5),
            })
            .collect();

        group.bench_with_input(BenchmarkId::new("add_finalize", count), &values, |b, values| {
            let mut pb = ParameterBuffer::with_capacity(1024);
            b.iter(|| {
                pb.reset();
                for v in values {
                    pb.add_value(v).unwrap();
                }
                black_box(pb.finalize().len())
            })
        });
    }

    let registry = TypeRegistry::builtin();
    let items: Vec<Option<Value>> = (0..256)
        .map(|i| if i % 10 == 0 { None } else { Some(Value::Int4(i)) })
        .collect();
    group.bench_function("add_array", |b| {
        let mut pb = ParameterBuffer::new();
        b.iter(|| {
            pb.reset();
            pb.add_array(&registry, DataType::Int4, black_box(&items)).unwrap();
        })
    });

    group.finish();
}

fn array_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("array");

    for len in [16usize, 1024].iter() {
        group.bench_with_input(BenchmarkId::new("encode_int8", len), len, |b, &len| {
            b.iter(|| {
                let mut enc = ArrayEncoder::one_dim(20, len).unwrap();
                for i in 0..len {
                    enc.push_value(&Value::Int8(i as i64)).unwrap();
                }
                black_box(enc.finish().unwrap())
            })
        });

        let mut enc = ArrayEncoder::one_dim(20, *len).unwrap();
        for i in 0..*len {
            enc.push_value(&Value::Int8(i as i64)).unwrap();
        }
        let bytes = enc.finish().unwrap();
        group.bench_with_input(BenchmarkId::new("decode_int8", len), &bytes, |b, bytes| {
            b.iter(|| ArrayDecoder::new(black_box(bytes)).unwrap().into_values().unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    numeric_benchmark,
    parameter_buffer_benchmark,
    array_benchmark
);
criterion_main!(benches);
