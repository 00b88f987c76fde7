pub mod cipher;
pub mod mutation;
pub mod rounds;
pub mod runner;
pub mod types;

pub use self::cipher::PreparedCipher;
pub use self::rounds::{Consolidation, Rounds};
pub use self::runner::{Breaker, NoProgress, ProgressCallback, SearchOptions};
pub use self::types::{RoundOutcome, SearchResult};

use crate::consts::QUADGRAM_LEN;
use crate::scorer::{engine, QuadgramModel};

/// Steepest-ascent hill climber over the decryption mapping of one cipher.
///
/// `decode[c]` is the plaintext symbol for cipher symbol `c`. Swapping two
/// entries of `decode` is the same move as swapping two positions of the
/// key, so both span the same neighbourhood.
pub struct Climber<'a> {
    table: &'a [f32],
    cipher: &'a PreparedCipher,
    decode: Vec<u8>,
    plain: Vec<u8>,
    sum: f64,

    // Window dedup for a single swap.
    marks: Vec<u32>,
    stamp: u32,
    touched: Vec<usize>,

    keys_evaluated: u64,
}

impl<'a> Climber<'a> {
    /// `decode` must be a permutation of the cipher's alphabet indices.
    pub fn new(model: &'a QuadgramModel, cipher: &'a PreparedCipher, decode: Vec<u8>) -> Self {
        debug_assert!(mutation::is_permutation(&decode, cipher.alphabet_len()));
        let table = model.table();
        let plain: Vec<u8> = cipher
            .symbols()
            .iter()
            .map(|&c| decode[c as usize])
            .collect();
        let sum = engine::window_sum(table, &plain);

        Self {
            table,
            cipher,
            decode,
            plain,
            sum,
            marks: vec![0; cipher.window_count()],
            stamp: 0,
            touched: Vec::with_capacity(64),
            keys_evaluated: 1,
        }
    }

    pub fn fitness(&self) -> f64 {
        self.sum / self.cipher.window_count() as f64
    }

    pub fn plain_symbols(&self) -> &[u8] {
        &self.plain
    }

    /// Starting key plus every neighbour of every pass. Swaps of two symbols
    /// absent from the ciphertext count too: they decode to the same text and
    /// are settled without a lookup.
    pub fn keys_evaluated(&self) -> u64 {
        self.keys_evaluated
    }

    /// Climbs until no single swap improves the score. Returns the number of
    /// moves taken.
    pub fn climb(&mut self) -> usize {
        let n = self.decode.len();
        let mut moves = 0;

        loop {
            let mut best_gain = 0.0f64;
            let mut best_pair = None;

            for a in 0..n {
                for b in (a + 1)..n {
                    self.keys_evaluated += 1;
                    // gain is zero
                    if self.cipher.positions(a).is_empty() && self.cipher.positions(b).is_empty() {
                        continue;
                    }
                    let gain = self.swap_gain(a, b);
                    self.swap(a, b);
                    if gain > best_gain {
                        best_gain = gain;
                        best_pair = Some((a, b));
                    }
                }
            }

            match best_pair {
                Some((a, b)) => {
                    let gain = self.swap_gain(a, b);
                    self.sum += gain;
                    moves += 1;
                    debug_assert!(mutation::is_permutation(&self.decode, n));
                }
                None => break,
            }
        }
        moves
    }

    /// Applies the swap of cipher symbols `a` and `b` and returns the change
    /// of the window sum. Call [`swap`](Self::swap) again to undo it.
    #[inline(always)]
    fn swap_gain(&mut self, a: usize, b: usize) -> f64 {
        self.collect_windows(a, b);
        let before = self.touched_sum();
        self.swap(a, b);
        let after = self.touched_sum();
        after - before
    }

    #[inline(always)]
    fn swap(&mut self, a: usize, b: usize) {
        self.decode.swap(a, b);
        let (pa, pb) = (self.decode[a], self.decode[b]);
        for &p in self.cipher.positions(a) {
            self.plain[p] = pa;
        }
        for &p in self.cipher.positions(b) {
            self.plain[p] = pb;
        }
    }

    fn collect_windows(&mut self, a: usize, b: usize) {
        if self.stamp == u32::MAX {
            self.marks.iter_mut().for_each(|m| *m = 0);
            self.stamp = 0;
        }
        self.stamp += 1;
        self.touched.clear();

        let last = self.marks.len() - 1;
        let cipher = self.cipher;
        for &p in cipher.positions(a).iter().chain(cipher.positions(b)) {
            let lo = p.saturating_sub(QUADGRAM_LEN - 1);
            let hi = p.min(last);
            for w in lo..=hi {
                if self.marks[w] != self.stamp {
                    self.marks[w] = self.stamp;
                    self.touched.push(w);
                }
            }
        }
    }

    #[inline(always)]
    fn touched_sum(&self) -> f64 {
        self.touched
            .iter()
            .map(|&w| self.table[engine::pack(&self.plain[w..w + QUADGRAM_LEN])] as f64)
            .sum()
    }

    pub fn into_outcome(self) -> RoundOutcome {
        RoundOutcome {
            fitness: self.fitness(),
            key: mutation::invert(&self.decode),
            keys_evaluated: self.keys_evaluated,
        }
    }
}

/// One round: a fresh key drawn from `seed`, climbed to its local optimum.
pub fn run_round(model: &QuadgramModel, cipher: &PreparedCipher, seed: u64) -> RoundOutcome {
    let mut rng = fastrand::Rng::with_seed(seed);
    let start = mutation::random_permutation(&mut rng, cipher.alphabet_len());
    let mut climber = Climber::new(model, cipher, start);
    climber.climb();
    climber.into_outcome()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Alphabet;
    use crate::scorer::ModelBuilder;

    fn tiny_model() -> QuadgramModel {
        let mut b = ModelBuilder::new(Alphabet::default()).unwrap();
        b.feed_str("the quick brown fox jumps over the lazy dog and then the fox sleeps");
        b.build().unwrap()
    }

    #[test]
    fn test_incremental_sum_matches_full_rescore() {
        let model = tiny_model();
        let cipher = PreparedCipher::new("uifrvjdlcspxogpykvnqtpwfsuifmbazeph", &Alphabet::default())
            .unwrap();
        let mut rng = fastrand::Rng::with_seed(3);
        let start = mutation::random_permutation(&mut rng, 26);
        let mut climber = Climber::new(&model, &cipher, start);

        for (a, b) in [(0, 5), (4, 19), (7, 8), (1, 25)] {
            let gain = climber.swap_gain(a, b);
            climber.sum += gain;
            let full = engine::window_sum(model.table(), climber.plain_symbols());
            assert!((climber.sum - full).abs() < 1e-6);
        }
    }

    #[test]
    fn test_climb_ends_at_local_optimum() {
        let model = tiny_model();
        let cipher = PreparedCipher::new("uifrvjdlcspxogpykvnqtpwfsuifmbazeph", &Alphabet::default())
            .unwrap();
        let outcome_a = run_round(&model, &cipher, 11);
        let outcome_b = run_round(&model, &cipher, 11);
        assert_eq!(outcome_a, outcome_b);

        let decode: Vec<u8> = {
            let mut d = vec![0u8; 26];
            for (plain, &c) in outcome_a.key.iter().enumerate() {
                d[c] = plain as u8;
            }
            d
        };
        let mut climber = Climber::new(&model, &cipher, decode);
        assert!((climber.fitness() - outcome_a.fitness).abs() < 1e-9);
        assert_eq!(climber.climb(), 0);
        // a full neighbourhood pass plus the starting key
        assert_eq!(climber.keys_evaluated(), 1 + 26 * 25 / 2);
    }

    #[test]
    fn test_absent_symbols_still_count_as_neighbours() {
        let model = tiny_model();
        let cipher = PreparedCipher::new("the hen then met ten men", &Alphabet::default()).unwrap();
        let mut rng = fastrand::Rng::with_seed(5);
        let start = mutation::random_permutation(&mut rng, 26);
        let mut climber = Climber::new(&model, &cipher, start);
        let moves = climber.climb() as u64;
        assert_eq!(climber.keys_evaluated(), 1 + (moves + 1) * (26 * 25 / 2));
    }
}
