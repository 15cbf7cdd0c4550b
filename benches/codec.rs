#![allow(clippy::unwrap_used)]

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use fido_cbor::{decode, encode, CborValue};

fn sample_small() -> Vec<u8> {
    vec![0xa1, 0x61, 0x61, 0x01] // {"a": 1}
}

fn sample_medium() -> Vec<u8> {
    let mut entries = Vec::new();
    for i in 0..64_i64 {
        entries.push((
            CborValue::text(format!("k{i:03}")),
            CborValue::array(vec![
                CborValue::int(i),
                CborValue::bytes(vec![0xab; 24]),
                CborValue::float64(f64::from(i as i32) * 0.5),
            ]),
        ));
    }
    encode(&CborValue::map(entries)).unwrap()
}

fn bench_codec(c: &mut Criterion) {
    let small = sample_small();
    c.bench_function("decode_small", |b| {
        b.iter(|| decode(black_box(&small)).unwrap())
    });

    let medium = sample_medium();
    c.bench_function("decode_medium", |b| {
        b.iter(|| decode(black_box(&medium)).unwrap())
    });

    let decoded = decode(&medium).unwrap();
    c.bench_function("encode_medium", |b| {
        b.iter(|| encode(black_box(&decoded)).unwrap())
    });
}

criterion_group!(benches, bench_codec);
criterion_main!(benches);
