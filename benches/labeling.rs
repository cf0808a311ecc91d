use std::hint::black_box;
use std::sync::Arc;

use criterion::{Criterion, criterion_group, criterion_main};
use motif::category::{default_keyword_store, default_semantic_store};
use motif::embedding::{CachedEmbedder, DEFAULT_HASHING_DIMENSION, HashingTextEmbedder};
use motif::labeler::{Labeler, SemanticLabeler, label_keyword};
use motif::miner::KeywordMiner;

const SAMPLE_RESPONSES: &[&str] = &[
    "Buena atención del ejecutivo y rapidez en los trámites",
    "Cercanía a la faena, está a dos cuadras",
    "Por el precio, es más barato que la competencia",
    "Recomendación de un colega de la empresa",
    "Confianza en la institución y su trayectoria",
    "Los cursos de capacitación son muy completos",
    "No sé, la empresa lo decidió",
    "Convenio con la empresa",
];

fn generate_responses(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| format!("{} {}", SAMPLE_RESPONSES[i % SAMPLE_RESPONSES.len()], i % 17))
        .collect()
}

fn bench_keyword_labeling(c: &mut Criterion) {
    let store = default_keyword_store();
    let responses = generate_responses(1000);

    c.bench_function("label_keyword_1000", |b| {
        b.iter(|| {
            for response in &responses {
                let _ = black_box(label_keyword(black_box(response), &store));
            }
        })
    });
}

fn bench_mining(c: &mut Criterion) {
    let responses = generate_responses(1000);
    let miner = KeywordMiner::default();

    c.bench_function("mine_1000", |b| {
        b.iter(|| black_box(miner.mine_all(black_box(&responses))))
    });
}

fn bench_semantic_labeling(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap();
    let embedder = HashingTextEmbedder::new(DEFAULT_HASHING_DIMENSION).unwrap();
    let labeler = SemanticLabeler::new(Arc::new(CachedEmbedder::new(Arc::new(embedder))));
    let store = default_semantic_store();
    let responses = generate_responses(100);

    c.bench_function("label_semantic_hashing_100", |b| {
        b.iter(|| {
            runtime.block_on(async {
                for response in &responses {
                    let _ = black_box(labeler.label(response, &store).await.unwrap());
                }
            })
        })
    });
}

criterion_group!(
    benches,
    bench_keyword_labeling,
    bench_mining,
    bench_semantic_labeling
);
criterion_main!(benches);
