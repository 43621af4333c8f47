//! Criterion benchmarks for the hot engine paths: fingerprint extraction
//! (per file) and pair comparison (O(n²) per run).

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use audiodupe::engine::{compare, fingerprint, Fingerprint};

fn tone_sweep(secs: f32, sample_rate: u32) -> Vec<f32> {
    let n = (secs * sample_rate as f32) as usize;
    (0..n)
        .map(|i| {
            let t = i as f32 / sample_rate as f32;
            let freq = 220.0 + 40.0 * (t * 0.7).sin() * t;
            0.5 * (2.0 * std::f32::consts::PI * freq * t).sin()
        })
        .collect()
}

fn fingerprints() -> (Fingerprint, Fingerprint) {
    let a = tone_sweep(30.0, 11_025);
    let mut b = a.clone();
    for s in b.iter_mut().skip(1_000).take(2_000) {
        *s *= 0.9;
    }
    (
        fingerprint(&a, 11_025).unwrap(),
        fingerprint(&b, 11_025).unwrap(),
    )
}

fn bench_fingerprint(c: &mut Criterion) {
    let samples = tone_sweep(30.0, 44_100);
    c.bench_function("fingerprint_30s_44k1", |bench| {
        bench.iter(|| fingerprint(black_box(&samples), 44_100).unwrap());
    });
}

fn bench_compare(c: &mut Criterion) {
    let (fp_a, fp_b) = fingerprints();
    c.bench_function("compare_near_pair", |bench| {
        bench.iter(|| compare(0, 1, black_box(&fp_a), black_box(&fp_b)));
    });

    c.bench_function("hamming", |bench| {
        bench.iter(|| black_box(&fp_a).hamming(black_box(&fp_b)));
    });
}

criterion_group!(benches, bench_fingerprint, bench_compare);
criterion_main!(benches);
