//! Benchmarks for the body-text classifier over synthetic height
//! distributions shaped like a scanned book page: a noise band, a dominant
//! body band, and a sparse heading band.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use lector_server::layout::{cluster_sizes, filter_body_words, BodyBand, WordRecord, DEFAULT_BANDS};

/// Deterministic pseudo-random heights (xorshift, fixed seed)
fn synthetic_heights(count: usize) -> Vec<f64> {
    let mut state: u64 = 0x9e37_79b9_7f4a_7c15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        state
    };

    (0..count)
        .map(|_| {
            let roll = next() % 100;
            let jitter = (next() % 100) as f64 / 100.0;
            if roll < 10 {
                4.0 + jitter // punctuation noise
            } else if roll < 90 {
                12.0 + jitter * 2.0 // body text
            } else {
                28.0 + jitter * 4.0 // headings
            }
        })
        .collect()
}

fn records_from(heights: &[f64]) -> Vec<WordRecord> {
    heights
        .iter()
        .map(|&height| WordRecord {
            text: "word".to_string(),
            height,
        })
        .collect()
}

fn bench_cluster_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster_sizes");
    for &count in &[200usize, 1_000, 4_000] {
        let heights = synthetic_heights(count);
        group.bench_function(format!("{}_words", count), |b| {
            b.iter(|| cluster_sizes(black_box(&heights), DEFAULT_BANDS))
        });
    }
    group.finish();
}

fn bench_full_filter(c: &mut Criterion) {
    let heights = synthetic_heights(2_000);
    let records = records_from(&heights);

    c.bench_function("cluster_and_filter_2000_words", |b| {
        b.iter(|| {
            let breaks = cluster_sizes(black_box(&heights), DEFAULT_BANDS);
            filter_body_words(black_box(&records), &breaks, BodyBand::default())
        })
    });
}

criterion_group!(benches, bench_cluster_sizes, bench_full_filter);
criterion_main!(benches);
