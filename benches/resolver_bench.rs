use criterion::{black_box, criterion_group, criterion_main, Criterion};
use music_battle_core::resolver::digits_for;

pub fn digitization_benchmark(c: &mut Criterion) {
    c.bench_function("digit extraction", |b| {
        b.iter(|| digits_for(black_box(99.8765)))
    });
}

criterion_group!(benches, digitization_benchmark);
criterion_main!(benches);
