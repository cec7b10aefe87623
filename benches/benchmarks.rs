//! Benchmarks for packet construction
//!
//! Run with: cargo bench

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tesoro_native::packet::key_color_sequence;
use tesoro_native::{key_names, lookup_key_code, Color, Profile};

/// Key lookup, first and last entries of the table
fn bench_lookup(c: &mut Criterion) {
    let mut group = c.benchmark_group("lookup");

    group.bench_function("first", |b| b.iter(|| lookup_key_code(black_box("esc"))));
    group.bench_function("last", |b| {
        b.iter(|| lookup_key_code(black_box("kp_period")))
    });
    group.bench_function("upper_case", |b| {
        b.iter(|| lookup_key_code(black_box("KP_PERIOD")))
    });

    group.finish();
}

/// Full spectrum frames of increasing size
fn bench_key_colors(c: &mut Criterion) {
    let Ok(profile) = Profile::new(1) else {
        return;
    };
    let all: Vec<&str> = key_names().collect();

    let mut group = c.benchmark_group("key_color_sequence");

    for count in [1usize, 16, all.len()] {
        let colors: Vec<(&str, Color)> = all
            .iter()
            .take(count)
            .enumerate()
            .map(|(i, &name)| (name, Color::new(i as u8, 255 - i as u8, 0x80)))
            .collect();

        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &colors, |b, colors| {
            b.iter(|| key_color_sequence(black_box(colors.iter().copied()), profile))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lookup, bench_key_colors);
criterion_main!(benches);
