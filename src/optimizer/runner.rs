use super::cipher::PreparedCipher;
use super::rounds::{Consolidation, Rounds};
use super::types::SearchResult;
use crate::config::SearchParams;
use crate::error::{SfResult, SubForgeError};
use crate::key::{Alphabet, SubstitutionKey};
use crate::scorer::{ModelInfo, QuadgramModel};
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, PartialEq)]
pub struct SearchOptions {
    pub consolidate: usize,
    pub max_tries: usize,
    pub num_threads: usize,
    pub seed: Option<u64>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self::from(&SearchParams::default())
    }
}

impl From<&SearchParams> for SearchOptions {
    fn from(params: &SearchParams) -> Self {
        let num_threads = if params.threads == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            params.threads
        };
        Self {
            consolidate: params.consolidate,
            max_tries: params.max_tries,
            num_threads,
            seed: params.seed,
        }
    }
}

impl SearchOptions {
    fn validate(&self) -> SfResult<()> {
        SearchParams {
            consolidate: self.consolidate,
            max_tries: self.max_tries,
            threads: self.num_threads,
            seed: self.seed,
        }
        .validate()
    }
}

/// Receives an update after every round.
/// Returning false stops the search; the best key so far is still returned.
pub trait ProgressCallback: Send + Sync {
    fn on_round(&self, round: usize, best_fitness: f64, consolidation: usize) -> bool;
}

pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_round(&self, _round: usize, _best_fitness: f64, _consolidation: usize) -> bool {
        true
    }
}

/// Breaks substitution ciphers against one shared quadgram model.
#[derive(Debug, Clone)]
pub struct Breaker {
    model: Arc<QuadgramModel>,
}

impl Breaker {
    pub fn new(model: Arc<QuadgramModel>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &Arc<QuadgramModel> {
        &self.model
    }

    pub fn info(&self) -> &ModelInfo {
        self.model.info()
    }

    pub fn calc_fitness(&self, text: &str) -> SfResult<f64> {
        self.model.fitness(text)
    }

    /// Runs a search with default threading and a random seed.
    pub fn break_cipher(
        &self,
        ciphertext: &str,
        consolidate: usize,
        max_tries: usize,
    ) -> SfResult<SearchResult> {
        let options = SearchOptions {
            consolidate,
            max_tries,
            ..Default::default()
        };
        self.search(ciphertext, &options, &NoProgress)
    }

    pub fn search<CB: ProgressCallback>(
        &self,
        ciphertext: &str,
        options: &SearchOptions,
        callback: &CB,
    ) -> SfResult<SearchResult> {
        let alphabet = self.model.alphabet();
        alphabet.ensure_scorable()?;
        options.validate()?;
        let cipher = PreparedCipher::new(ciphertext, alphabet)?;

        let pool = if options.num_threads > 1 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(options.num_threads)
                .build()
                .map_err(|e| {
                    SubForgeError::Configuration(format!("Failed to start worker pool: {}", e))
                })?;
            Some(pool)
        } else {
            None
        };

        let base_seed = options.seed.unwrap_or_else(|| fastrand::u64(..));
        debug!(
            base_seed,
            threads = options.num_threads,
            symbols = cipher.len(),
            "Starting search"
        );

        let start = Instant::now();
        let mut rounds = Rounds::new(&self.model, &cipher, base_seed, options.max_tries, pool);
        let mut tally = Consolidation::new(options.consolidate);
        let mut aborted = false;

        loop {
            rounds.set_lookahead(tally.rounds_needed());
            let Some(outcome) = rounds.next() else {
                break;
            };
            debug!(
                round = tally.rounds() + 1,
                fitness = outcome.fitness,
                keys = outcome.keys_evaluated,
                "Round finished"
            );
            tally.observe(outcome);

            if tally.is_settled() {
                break;
            }
            let best_fitness = tally.best().map_or(0.0, |b| b.fitness);
            if !callback.on_round(tally.rounds(), best_fitness, tally.count()) {
                aborted = true;
                break;
            }
        }

        let seconds = start.elapsed().as_secs_f64();
        let consolidated = tally.is_settled();
        let nbr_rounds = tally.rounds();
        let nbr_keys = tally.keys_evaluated();

        let best = tally
            .into_best()
            .ok_or_else(|| SubForgeError::Configuration("no round was run".to_string()))?;
        let key = SubstitutionKey::from_indices(alphabet.clone(), best.key);
        let keys_per_second = if seconds > 0.0 {
            nbr_keys as f64 / seconds
        } else {
            0.0
        };

        if consolidated {
            info!(
                "Key confirmed by {} rounds after {} rounds ({:.0} keys/s)",
                options.consolidate, nbr_rounds, keys_per_second
            );
        } else if aborted {
            warn!("Search aborted after {} rounds; key is unconfirmed", nbr_rounds);
        } else {
            warn!(
                "Reached {} rounds without consolidation; key is unconfirmed",
                nbr_rounds
            );
        }

        Ok(SearchResult {
            plaintext: key.decode(ciphertext),
            ciphertext: ciphertext.to_string(),
            key: key.key(),
            alphabet: alphabet.as_string(),
            fitness: best.fitness,
            nbr_keys,
            nbr_rounds,
            keys_per_second,
            seconds,
            consolidated,
        })
    }

    /// Builds a model from `corpus` and writes it to `sink` as JSON.
    pub fn generate_quadgrams<R: BufRead, W: Write>(
        corpus: R,
        sink: W,
        alphabet: Alphabet,
    ) -> SfResult<ModelInfo> {
        let model = QuadgramModel::generate(corpus, alphabet)?;
        model.save(sink)?;
        Ok(model.info().clone())
    }
}
