use rstest::rstest;
use std::sync::atomic::{AtomicUsize, Ordering};
use subforge::config::SearchParams;
use subforge::key::{Alphabet, SubstitutionKey};
use subforge::optimizer::{Breaker, NoProgress, ProgressCallback, SearchOptions};
use subforge::SubForgeError;

mod common;

fn breaker() -> Breaker {
    Breaker::new(common::english_model())
}

fn options(consolidate: usize, max_tries: usize, threads: usize, seed: u64) -> SearchOptions {
    SearchOptions {
        consolidate,
        max_tries,
        num_threads: threads,
        seed: Some(seed),
    }
}

fn is_alphabet_permutation(key: &str) -> bool {
    let mut chars: Vec<char> = key.chars().collect();
    chars.sort_unstable();
    chars.into_iter().collect::<String>() == Alphabet::default().as_string()
}

#[test]
fn test_recovers_english_plaintext() {
    let plaintext = common::paragraph("She then explained a method");
    let key = SubstitutionKey::from_keyword("wisdom", Alphabet::default()).unwrap();
    let ciphertext = key.encode(plaintext);

    let result = breaker()
        .search(&ciphertext, &options(3, 1000, 4, 2024), &NoProgress)
        .unwrap();

    let agreement = common::letter_agreement(plaintext, &result.plaintext);
    assert!(
        agreement >= 0.9,
        "only {:.1}% of letters recovered:\n{}",
        agreement * 100.0,
        result.plaintext
    );
    assert!(result.fitness > 80.0);
    assert_eq!(result.ciphertext, ciphertext);
    assert!(is_alphabet_permutation(&result.key));
}

// Not part of the training corpus.
const UNSEEN_PASSAGE: &str = "When the weather turned cold that year, the harbour master decided \
that the boats would stay in port until the storms had passed. Most of the fishermen agreed with him, \
but a few of the younger men were angry, because they needed the money and their families were \
waiting for them at home. In the evenings they met in the small room above the bakery and talked \
about the prices of fish, the cost of new nets and the long journey to the northern markets. \
Nobody could say when the sea would be calm again, and so they waited, repaired their ropes and \
painted the hulls of their boats in bright colours while the wind howled over the roofs.";

#[test]
fn test_recovers_text_outside_training_corpus() {
    assert!(!common::corpus().contains("harbour master"));
    let key = SubstitutionKey::from_keyword("wisdom", Alphabet::default()).unwrap();
    let ciphertext = key.encode(UNSEEN_PASSAGE);

    let result = breaker()
        .search(&ciphertext, &options(3, 1000, 4, 2024), &NoProgress)
        .unwrap();

    // A small training corpus can leave a rare letter or two swapped.
    let agreement = common::letter_agreement(UNSEEN_PASSAGE, &result.plaintext);
    assert!(
        agreement >= 0.85,
        "only {:.1}% of letters recovered:\n{}",
        agreement * 100.0,
        result.plaintext
    );
    assert!(is_alphabet_permutation(&result.key));
}

#[test]
fn test_consolidate_one_runs_single_round() {
    let plaintext = common::paragraph("The children liked this idea");
    let key = SubstitutionKey::from_keyword("compass", Alphabet::default()).unwrap();
    let ciphertext = key.encode(plaintext);

    let result = breaker()
        .search(&ciphertext, &options(1, 1000, 4, 5), &NoProgress)
        .unwrap();
    assert_eq!(result.nbr_rounds, 1);
    assert!(result.consolidated);
    assert!(result.nbr_keys > 325);
}

#[test]
fn test_same_seed_same_result_for_any_thread_count() {
    let plaintext = common::paragraph("After school the children");
    let key = SubstitutionKey::from_keyword("river", Alphabet::default()).unwrap();
    let ciphertext = key.encode(plaintext);
    let b = breaker();

    let single = b.search(&ciphertext, &options(2, 12, 1, 77), &NoProgress).unwrap();
    let pooled = b.search(&ciphertext, &options(2, 12, 4, 77), &NoProgress).unwrap();

    assert_eq!(single.key, pooled.key);
    assert_eq!(single.plaintext, pooled.plaintext);
    assert_eq!(single.fitness, pooled.fitness);
    assert_eq!(single.nbr_rounds, pooled.nbr_rounds);
    assert_eq!(single.nbr_keys, pooled.nbr_keys);
    assert_eq!(single.consolidated, pooled.consolidated);
}

#[test]
fn test_max_tries_bounds_rounds() {
    // Too short to ever consolidate 30 times within 3 rounds.
    let ciphertext = "Qdfp fp z paboaq jappzca";
    let result = breaker()
        .search(ciphertext, &options(30, 3, 2, 1), &NoProgress)
        .unwrap();
    assert_eq!(result.nbr_rounds, 3);
    assert!(!result.consolidated);
    assert!(is_alphabet_permutation(&result.key));
    assert_eq!(result.to_string(), format!("key = {}", result.key));
}

struct StopAfter {
    limit: usize,
    calls: AtomicUsize,
}

impl ProgressCallback for StopAfter {
    fn on_round(&self, round: usize, _best_fitness: f64, _consolidation: usize) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        round < self.limit
    }
}

#[test]
fn test_progress_callback_can_abort() {
    let ciphertext = common::paragraph("The teacher folded the letter");
    let stop = StopAfter {
        limit: 2,
        calls: AtomicUsize::new(0),
    };
    let result = breaker()
        .search(ciphertext, &options(30, 100, 1, 9), &stop)
        .unwrap();
    assert_eq!(result.nbr_rounds, 2);
    assert_eq!(stop.calls.load(Ordering::SeqCst), 2);
    assert!(!result.consolidated);
}

#[rstest]
#[case(0, 10)]
#[case(31, 10)]
#[case(3, 0)]
#[case(3, 10_001)]
fn test_out_of_range_parameters(#[case] consolidate: usize, #[case] max_tries: usize) {
    let res = breaker().break_cipher("Some perfectly fine ciphertext", consolidate, max_tries);
    assert!(matches!(res, Err(SubForgeError::Configuration(_))));
}

#[rstest]
#[case("")]
#[case("abc")]
#[case("a1b2c3 ... !!!")]
fn test_too_short_ciphertext(#[case] text: &str) {
    let res = breaker().break_cipher(text, 3, 10);
    assert!(matches!(res, Err(SubForgeError::Input(_))));
}

#[test]
fn test_calc_fitness_is_model_fitness() {
    let b = breaker();
    let text = common::paragraph("In the autumn the sailor returned");
    assert_eq!(b.calc_fitness(text).unwrap(), b.model().fitness(text).unwrap());
    assert_eq!(b.calc_fitness(text).unwrap(), b.calc_fitness(text).unwrap());
    assert_eq!(b.info(), b.model().info());
}

#[test]
fn test_options_from_params() {
    let params = SearchParams {
        consolidate: 4,
        max_tries: 50,
        threads: 0,
        seed: Some(3),
    };
    let opts = SearchOptions::from(&params);
    assert_eq!(opts.consolidate, 4);
    assert_eq!(opts.max_tries, 50);
    assert!(opts.num_threads >= 1);
    assert_eq!(opts.seed, Some(3));
}

#[test]
fn test_generate_quadgrams_writes_loadable_table() {
    let mut sink = Vec::new();
    let info = Breaker::generate_quadgrams(
        common::corpus().as_bytes(),
        &mut sink,
        Alphabet::default(),
    )
    .unwrap();

    let loaded = subforge::scorer::QuadgramModel::load(sink.as_slice()).unwrap();
    assert_eq!(loaded.info().most_frequent_quadgram, info.most_frequent_quadgram);
    assert_eq!(info.nbr_quadgrams, common::english_model().info().nbr_quadgrams);
}
