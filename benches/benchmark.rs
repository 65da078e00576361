// Flat index search benchmarks for SheetQA
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;
use sheetqa_core::{FlatIndex, HashEmbedder, TextEmbedder, Vector};

fn generate_random_vector(rng: &mut impl Rng, dim: usize) -> Vector {
    let data: Vec<f32> = (0..dim).map(|_| rng.random_range(-1.0f32..1.0f32)).collect();
    Vector::new(data)
}

fn benchmark_index_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("index_build");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::new("flat", size), size, |b, &size| {
            let mut rng = rand::rng();
            let vectors: Vec<Vector> = (0..size)
                .map(|_| generate_random_vector(&mut rng, 384))
                .collect();

            b.iter(|| {
                let index = FlatIndex::build(384, vectors.clone()).unwrap();
                black_box(index);
            });
        });
    }

    group.finish();
}

fn benchmark_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search");

    let mut rng = rand::rng();
    for size in [100, 1000, 10000].iter() {
        let vectors: Vec<Vector> = (0..*size)
            .map(|_| generate_random_vector(&mut rng, 384))
            .collect();
        let index = FlatIndex::build(384, vectors).unwrap();
        let query = generate_random_vector(&mut rng, 384);

        group.bench_with_input(BenchmarkId::new("flat_top3", size), size, |b, _| {
            b.iter(|| {
                let results = index.search(black_box(&query), 3).unwrap();
                black_box(results);
            });
        });
    }

    group.finish();
}

fn benchmark_hash_embed(c: &mut Criterion) {
    let embedder = HashEmbedder::default();
    let texts: Vec<String> = (0..1000)
        .map(|i| format!("row number {i} with a handful of cell values"))
        .collect();

    c.bench_function("hash_embed_1000_rows", |b| {
        b.iter(|| {
            let embeddings = embedder.embed_batch(black_box(&texts)).unwrap();
            black_box(embeddings);
        });
    });
}

criterion_group!(
    benches,
    benchmark_index_build,
    benchmark_search,
    benchmark_hash_embed
);
criterion_main!(benches);
