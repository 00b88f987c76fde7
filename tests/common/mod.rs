#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use subforge::key::Alphabet;
use subforge::scorer::QuadgramModel;

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

pub fn corpus() -> &'static str {
    static CORPUS: OnceLock<String> = OnceLock::new();
    CORPUS.get_or_init(|| {
        std::fs::read_to_string(fixture_path("corpus_en.txt")).expect("corpus fixture missing")
    })
}

/// English model generated from the corpus fixture, shared by all tests.
pub fn english_model() -> Arc<QuadgramModel> {
    static MODEL: OnceLock<Arc<QuadgramModel>> = OnceLock::new();
    MODEL
        .get_or_init(|| {
            Arc::new(
                QuadgramModel::generate(corpus().as_bytes(), Alphabet::default())
                    .expect("failed to build English model"),
            )
        })
        .clone()
}

/// The corpus paragraph starting with `opening`.
pub fn paragraph(opening: &str) -> &'static str {
    corpus()
        .split("\n\n")
        .map(str::trim)
        .find(|p| p.starts_with(opening))
        .expect("paragraph not in corpus")
}

/// Share of letters of `expected` reproduced at the same position in `actual`.
pub fn letter_agreement(expected: &str, actual: &str) -> f64 {
    let mut letters = 0usize;
    let mut same = 0usize;
    for (e, a) in expected.chars().zip(actual.chars()) {
        if e.is_alphabetic() {
            letters += 1;
            if e == a {
                same += 1;
            }
        }
    }
    if letters == 0 {
        return 1.0;
    }
    same as f64 / letters as f64
}
