use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use num_bigint::BigUint;
use num_traits::One;
use prime_share::{ShamirShare, next_prime};

// select_modulus caches, so the uncached search is measured through next_prime.
fn bench_modulus_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("modulus_search");

    for size in [16usize, 32, 64].iter() {
        let lower = BigUint::one() << (8 * size);
        group.bench_function(format!("modulus_{}_bytes", size), |b| {
            b.iter(|| black_box(next_prime(black_box(&lower))));
        });
    }

    group.sample_size(10);
    for size in [256usize, 1024].iter() {
        let lower = BigUint::one() << (8 * size);
        group.bench_function(format!("modulus_{}_bytes", size), |b| {
            b.iter(|| black_box(next_prime(black_box(&lower))));
        });
    }

    group.finish();
}

fn bench_split(c: &mut Criterion) {
    let mut group = c.benchmark_group("split");

    // Benchmark different data sizes
    for size in [16usize, 32, 64].iter() {
        let data = vec![0xA5u8; *size];
        let shamir = ShamirShare::new(5, 3).unwrap();

        group.bench_function(format!("split_{}_bytes", size), |b| {
            b.iter(|| {
                black_box(shamir.split(black_box(&data)).unwrap());
            });
        });
    }

    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconstruct");
    let shamir = ShamirShare::new(5, 3).unwrap();

    for size in [16usize, 32, 64].iter() {
        let data = vec![0xA5u8; *size];
        let shares = shamir.split(&data).unwrap();

        group.bench_function(format!("reconstruct_{}_bytes", size), |b| {
            b.iter(|| {
                black_box(ShamirShare::reconstruct(black_box(&shares[0..3])).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_modulus_search, bench_split, bench_reconstruct);
criterion_main!(benches);
