//! Criterion benchmarks for column encode and decode.
//!
//! Run with:
//!   cargo bench --bench encode

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use binvec::{decode, encode_bool, encode_i32, encode_strs, Column, NaBitset, Utf8View};

fn all_present(n: usize) -> NaBitset {
    let mut na = NaBitset::new();
    for _ in 0..n {
        na.push(false);
    }
    na
}

fn bench_int_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("int_columns");

    for &rows in &[1_000usize, 100_000] {
        let values: Vec<i32> = (0..rows as i32).map(|i| i % 20_000).collect();
        let na = all_present(rows);

        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("encode_i32", rows), &values, |b, values| {
            b.iter(|| encode_i32(values, &na).unwrap())
        });

        let blob = encode_i32(&values, &na).unwrap();
        group.throughput(Throughput::Elements(rows as u64));
        group.bench_with_input(BenchmarkId::new("decode_sum_i32", rows), &blob, |b, blob| {
            b.iter(|| {
                let col: Column<i32> = decode(blob).unwrap();
                col.iter().map(|v| v as i64).sum::<i64>()
            })
        });
    }

    group.finish();
}

fn bench_bool_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("bool_columns");

    let rows = 100_000usize;
    let values: Vec<bool> = (0..rows).map(|i| i % 3 == 0).collect();
    let na = all_present(rows);

    group.throughput(Throughput::Elements(rows as u64));
    group.bench_with_input(BenchmarkId::new("encode_bool", rows), &values, |b, values| {
        b.iter(|| encode_bool(values, &na).unwrap())
    });

    let blob = encode_bool(&values, &na).unwrap();
    group.bench_with_input(BenchmarkId::new("decode_count_bool", rows), &blob, |b, blob| {
        b.iter(|| {
            let col: Column<bool> = decode(blob).unwrap();
            col.iter().filter(|&v| v).count()
        })
    });

    group.finish();
}

fn bench_string_columns(c: &mut Criterion) {
    let mut group = c.benchmark_group("string_columns");

    let rows = 10_000usize;
    let palette = ["alpha", "beta", "gamma", "delta", "epsilon", "zeta"];
    let values: Vec<&str> = (0..rows).map(|i| palette[i % palette.len()]).collect();
    let na = all_present(rows);

    // Six distinct values: takes the dictionary path.
    group.throughput(Throughput::Elements(rows as u64));
    group.bench_with_input(BenchmarkId::new("encode_dict", rows), &values, |b, values| {
        b.iter(|| encode_strs(values, &na).unwrap())
    });

    let blob = encode_strs(&values, &na).unwrap();
    group.bench_with_input(BenchmarkId::new("decode_views", rows), &blob, |b, blob| {
        b.iter(|| {
            let col: Column<Utf8View> = decode(blob).unwrap();
            col.iter().map(|v| v.len()).sum::<usize>()
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_int_columns,
    bench_bool_columns,
    bench_string_columns
);
criterion_main!(benches);
