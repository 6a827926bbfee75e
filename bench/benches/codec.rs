use std::hint::black_box;

use argmap::{ArgList, ArgMap, Decoder, Encoder, Timestamp};
use bytes::Bytes;
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

/// A telemetry-like record: scalars, a child map, a list of maps and a
/// couple of vectors.
fn record(i: usize) -> ArgMap {
    let map = ArgMap::new();
    map.set("id", i as u32);
    map.set("name", format!("sensor_{i}"));
    map.set("active", i % 2 == 0);
    map.set("range", -30.5);
    map.set("range|units", "dBm");
    map.set("time", Timestamp::from_millis(1_700_000_000_000 + i as i64));
    map.set("samples", (0..64).map(|s| s as f32 * 0.5).collect::<Vec<_>>());
    map.set("flags", (0..16).map(|s| s % 3 == 0).collect::<Vec<_>>());

    let history = ArgList::new();
    for h in 0..4 {
        history.push(ArgMap::from([("seq", h), ("delta", h * 10)]));
    }
    map.set("history", history);
    map
}

fn tree(records: usize) -> ArgMap {
    let root = ArgMap::new();
    let list: ArgList = (0..records).map(record).collect();
    root.set("records", list);
    root.set("count", records as u64);
    root
}

fn bench_encode(c: &mut Criterion) {
    let mut group = c.benchmark_group("encode");
    for records in [1, 100, 1000] {
        let root = tree(records);
        let len = root.encoded_len();
        let mut buf = vec![0u8; len];
        group.throughput(Throughput::Bytes(len as u64));

        group.bench_with_input(BenchmarkId::new("buffer", records), &root, |b, root| {
            b.iter(|| {
                let mut encoder = Encoder::new(&mut buf);
                black_box(encoder.encode(root).ok())
            })
        });
        group.bench_with_input(BenchmarkId::new("to_vec", records), &root, |b, root| {
            b.iter(|| black_box(root.to_vec()))
        });
        group.bench_with_input(BenchmarkId::new("to_bytes", records), &root, |b, root| {
            b.iter(|| {
                let bytes: Bytes = root.to_bytes();
                black_box(bytes)
            })
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("decode");
    for records in [1, 100, 1000] {
        let bytes = tree(records).to_vec();
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(records), &bytes, |b, bytes| {
            b.iter(|| black_box(Decoder::new(bytes).decode()))
        });
    }
    group.finish();
}

fn bench_access(c: &mut Criterion) {
    let root = tree(100);
    c.bench_function("path_read", |b| {
        b.iter(|| black_box(root.get("records|50|range", 0.0)))
    });
    c.bench_function("coerce_string", |b| {
        b.iter(|| black_box(root.get_str("records|50|id", "")))
    });
    c.bench_function("deep_clone", |b| b.iter(|| black_box(root.deep_clone())));
}

criterion_group!(benches, bench_encode, bench_decode, bench_access);
criterion_main!(benches);
