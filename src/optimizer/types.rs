use serde::Serialize;
use std::fmt;

/// Terminal state of one hill climb.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundOutcome {
    /// Key as alphabet indices: plaintext symbol `i` encrypts to `key[i]`.
    pub key: Vec<usize>,
    pub fitness: f64,
    pub keys_evaluated: u64,
}

/// Snapshot of one completed break.
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub ciphertext: String,
    pub plaintext: String,
    pub key: String,
    pub alphabet: String,
    pub fitness: f64,
    /// Candidate keys across all rounds: each start key plus every swap
    /// neighbourhood scanned, as counted by [`Climber::keys_evaluated`](super::Climber::keys_evaluated).
    pub nbr_keys: u64,
    pub nbr_rounds: usize,
    pub keys_per_second: f64,
    pub seconds: f64,
    /// False when the search stopped at `max_tries` (or was aborted) before
    /// the best key was rediscovered often enough.
    pub consolidated: bool,
}

impl fmt::Display for SearchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key = {}", self.key)
    }
}
