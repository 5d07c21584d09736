use criterion::{black_box, criterion_group, criterion_main, Criterion};
use votedraw_types::{Seed, VoterId};

fn blake2b_256_bench(c: &mut Criterion) {
    let data = [0xABu8; 256];

    c.bench_function("blake2b_256_256B", |b| {
        b.iter(|| votedraw_crypto::blake2b_256(black_box(&data)))
    });
}

fn pool_digest_bench(c: &mut Criterion) {
    let pool: Vec<VoterId> = (0..10_000).map(|i| VoterId::new(format!("voter{i}"))).collect();

    c.bench_function("eligible_pool_digest_10k", |b| {
        b.iter(|| votedraw_crypto::eligible_pool_digest(black_box(&pool)))
    });
}

fn draw_randomness_bench(c: &mut Criterion) {
    let seed = Seed::new([7u8; 32]);
    let context = [0x42u8; 32];

    c.bench_function("derive_draw_randomness", |b| {
        b.iter(|| votedraw_crypto::derive_draw_randomness(&seed, black_box(&context)))
    });
}

criterion_group!(benches, blake2b_256_bench, pool_digest_bench, draw_randomness_bench);
criterion_main!(benches);
