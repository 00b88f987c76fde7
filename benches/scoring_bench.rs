use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use subforge::key::{Alphabet, SubstitutionKey};
use subforge::optimizer::{run_round, PreparedCipher};
use subforge::scorer::QuadgramModel;

const CORPUS: &str = include_str!("../tests/fixtures/corpus_en.txt");

fn setup_model() -> QuadgramModel {
    QuadgramModel::generate(CORPUS.as_bytes(), Alphabet::default()).expect("Failed to build model")
}

fn criterion_benchmark(c: &mut Criterion) {
    let model = setup_model();
    let passage: String = CORPUS.chars().take(2000).collect();

    c.bench_function("fitness (2k chars)", |b| {
        b.iter(|| model.fitness(black_box(&passage)))
    });

    let key = SubstitutionKey::from_keyword("harbour", Alphabet::default())
        .expect("Failed to build key");
    let ciphertext = key.encode(&passage[..600]);
    let cipher = PreparedCipher::new(&ciphertext, model.alphabet()).expect("ciphertext too short");

    let mut seed = 0u64;
    c.bench_function("single round (600 chars)", |b| {
        b.iter(|| {
            seed += 1;
            run_round(&model, black_box(&cipher), seed)
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
