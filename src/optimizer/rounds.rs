use super::cipher::PreparedCipher;
use super::types::RoundOutcome;
use super::run_round;
use crate::scorer::QuadgramModel;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::collections::VecDeque;

/// Seed of round `round` for a search seeded with `base`.
#[inline]
pub fn round_seed(base: u64, round: usize) -> u64 {
    base.wrapping_add(round as u64)
}

/// Lazily produced round outcomes, at most `max_rounds` of them.
///
/// Rounds are computed in batches on the pool. The consumer bounds each batch
/// with [`set_lookahead`](Self::set_lookahead) so no round is started that
/// could not change the stopping decision. Outcomes are always yielded in
/// round order.
pub struct Rounds<'a> {
    model: &'a QuadgramModel,
    cipher: &'a PreparedCipher,
    base_seed: u64,
    next_round: usize,
    max_rounds: usize,
    lookahead: usize,
    pool: Option<ThreadPool>,
    parallelism: usize,
    pending: VecDeque<RoundOutcome>,
}

impl<'a> Rounds<'a> {
    pub fn new(
        model: &'a QuadgramModel,
        cipher: &'a PreparedCipher,
        base_seed: u64,
        max_rounds: usize,
        pool: Option<ThreadPool>,
    ) -> Self {
        let parallelism = pool.as_ref().map_or(1, |p| p.current_num_threads().max(1));
        Self {
            model,
            cipher,
            base_seed,
            next_round: 0,
            max_rounds,
            lookahead: 1,
            pool,
            parallelism,
            pending: VecDeque::new(),
        }
    }

    pub fn set_lookahead(&mut self, rounds: usize) {
        self.lookahead = rounds.max(1);
    }

    fn fill(&mut self) {
        let remaining = self.max_rounds - self.next_round;
        let batch = self.parallelism.min(self.lookahead).min(remaining);
        let first = self.next_round;
        let (model, cipher, base) = (self.model, self.cipher, self.base_seed);

        match &self.pool {
            Some(pool) if batch > 1 => {
                let outcomes: Vec<RoundOutcome> = pool.install(|| {
                    (first..first + batch)
                        .into_par_iter()
                        .map(|r| run_round(model, cipher, round_seed(base, r)))
                        .collect()
                });
                self.pending.extend(outcomes);
            }
            _ => {
                for r in first..first + batch {
                    self.pending
                        .push_back(run_round(model, cipher, round_seed(base, r)));
                }
            }
        }
        self.next_round += batch;
    }
}

impl<'a> Iterator for Rounds<'a> {
    type Item = RoundOutcome;

    fn next(&mut self) -> Option<RoundOutcome> {
        if self.pending.is_empty() && self.next_round < self.max_rounds {
            self.fill();
        }
        self.pending.pop_front()
    }
}

/// Best key so far and how many rounds agreed on it.
#[derive(Debug, Clone)]
pub struct Consolidation {
    threshold: usize,
    best: Option<RoundOutcome>,
    count: usize,
    rounds: usize,
    keys_evaluated: u64,
}

impl Consolidation {
    pub fn new(threshold: usize) -> Self {
        Self {
            threshold,
            best: None,
            count: 0,
            rounds: 0,
            keys_evaluated: 0,
        }
    }

    /// Folds one round into the tally.
    ///
    /// A strictly fitter key replaces the best and restarts the count at 1. The
    /// same key again bumps the count. Anything else leaves both alone, even at
    /// equal fitness.
    pub fn observe(&mut self, outcome: RoundOutcome) {
        self.rounds += 1;
        self.keys_evaluated += outcome.keys_evaluated;

        let improves = self
            .best
            .as_ref()
            .map_or(true, |best| outcome.fitness > best.fitness);
        if improves {
            self.best = Some(outcome);
            self.count = 1;
        } else if self.best.as_ref().is_some_and(|best| best.key == outcome.key) {
            self.count += 1;
        }
    }

    pub fn is_settled(&self) -> bool {
        self.count >= self.threshold
    }

    /// Fewest further rounds that could settle the search.
    pub fn rounds_needed(&self) -> usize {
        self.threshold.saturating_sub(self.count).max(1)
    }

    pub fn best(&self) -> Option<&RoundOutcome> {
        self.best.as_ref()
    }

    pub fn into_best(self) -> Option<RoundOutcome> {
        self.best
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn rounds(&self) -> usize {
        self.rounds
    }

    pub fn keys_evaluated(&self) -> u64 {
        self.keys_evaluated
    }
}
