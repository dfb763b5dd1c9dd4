use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bitmap_codecs::kernels::{bbc, wah};
use bitmap_codecs::BitVector;

// --- Mock bitmap generation ---

/// A bitmap index column: mostly zeros with `density` of the bits set.
fn generate_sparse_bits(size: usize, density: f64, seed: u64) -> BitVector {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..size).map(|_| rng.random_bool(density)).collect()
}

/// Long alternating runs, the best case for both codecs.
fn generate_run_bits(size: usize, run: usize) -> BitVector {
    (0..size).map(|i| (i / run) % 2 == 1).collect()
}

// --- Benchmark Suite ---

const BENCH_BITS: usize = 1 << 20;

fn bench_codecs(c: &mut Criterion) {
    let inputs = [
        ("Sparse 0.1%", generate_sparse_bits(BENCH_BITS, 0.001, 7)),
        ("Sparse 5%", generate_sparse_bits(BENCH_BITS, 0.05, 7)),
        ("Dense 50%", generate_sparse_bits(BENCH_BITS, 0.5, 7)),
        ("Runs of 4096", generate_run_bits(BENCH_BITS, 4096)),
    ];

    let mut group = c.benchmark_group("Bitmap Codecs Comparison");
    group.throughput(criterion::Throughput::Bytes((BENCH_BITS / 8) as u64));
    group.sample_size(20);

    for (label, bits) in &inputs {
        let (wah_encoded, final_length) = wah::compress(bits, 32).unwrap();
        let bbc_encoded = bbc::compress(bits).unwrap();

        group.bench_function(format!("Encode WAH-32 ({})", label), |b| {
            b.iter(|| black_box(wah::compress(black_box(bits), 32)))
        });
        group.bench_function(format!("Encode BBC ({})", label), |b| {
            b.iter(|| black_box(bbc::compress(black_box(bits))))
        });
        group.bench_function(format!("Decode WAH-32 ({})", label), |b| {
            b.iter(|| black_box(wah::decompress(black_box(&wah_encoded), final_length, 32)))
        });
        group.bench_function(format!("Decode BBC ({})", label), |b| {
            b.iter(|| black_box(bbc::decompress(black_box(&bbc_encoded))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codecs);
criterion_main!(benches);
