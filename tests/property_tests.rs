use proptest::prelude::*;
use subforge::key::{Alphabet, SubstitutionKey};
use subforge::optimizer::{mutation, run_round, PreparedCipher};
use subforge::scorer::ModelBuilder;

mod common;

// --- STRATEGIES ---

prop_compose! {
    fn arb_key()(
        perm in Just(Alphabet::default().chars().to_vec()).prop_shuffle()
    ) -> SubstitutionKey {
        let key: String = perm.into_iter().collect();
        SubstitutionKey::with_default_alphabet(&key).unwrap()
    }
}

fn arb_text() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9 ,.!?'\n\\-äÖßẞ\u{212A}]{0,200}"
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_decode_inverts_encode(key in arb_key(), text in arb_text()) {
        prop_assert_eq!(key.decode(&key.encode(&text)), text);
    }

    #[test]
    fn prop_encode_preserves_shape(key in arb_key(), text in arb_text()) {
        let encoded = key.encode(&text);
        prop_assert_eq!(encoded.chars().count(), text.chars().count());

        for (src, dst) in text.chars().zip(encoded.chars()) {
            if src.is_ascii_alphabetic() {
                prop_assert!(dst.is_ascii_alphabetic());
                prop_assert_eq!(src.is_uppercase(), dst.is_uppercase());
            } else {
                prop_assert_eq!(src, dst);
            }
        }
    }

    #[test]
    fn prop_encode_is_bijection_on_alphabet(key in arb_key()) {
        let alphabet = Alphabet::default().as_string();
        let image = key.encode(&alphabet);
        prop_assert_eq!(&image, &key.key());

        let mut sorted: Vec<char> = image.chars().collect();
        sorted.sort_unstable();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), alphabet.len());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn prop_round_outcome_is_permutation(seed in any::<u64>(), start in 0usize..4000) {
        let model = common::english_model();
        let text: String = common::corpus().chars().skip(start).take(120).collect();
        if let Ok(cipher) = PreparedCipher::new(&text, model.alphabet()) {
            let outcome = run_round(&model, &cipher, seed);
            let as_bytes: Vec<u8> = outcome.key.iter().map(|&i| i as u8).collect();
            prop_assert!(mutation::is_permutation(&as_bytes, model.alphabet().len()));
            prop_assert!(outcome.keys_evaluated > 0);
        }
    }

    #[test]
    fn prop_fitness_is_deterministic(start in 0usize..4000, len in 4usize..300) {
        let mut builder = ModelBuilder::new(Alphabet::default()).unwrap();
        builder.feed_str(common::corpus());
        let model = builder.build().unwrap();
        let text: String = common::corpus().chars().skip(start).take(len).collect();
        let first = model.fitness(&text);
        let second = common::english_model().fitness(&text);
        match (first, second) {
            (Ok(a), Ok(b)) => prop_assert_eq!(a, b),
            (Err(_), Err(_)) => {}
            _ => prop_assert!(false, "fitness disagreed on validity"),
        }
    }
}
