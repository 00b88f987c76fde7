use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Read-only summary of a quadgram table. Serializes with the same keys as
/// the metadata fields of [`QuadgramFile`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelInfo {
    pub alphabet: String,
    /// Quadgram windows counted while generating the table. Only characters of
    /// the alphabet contribute, so this is usually below the corpus size.
    pub nbr_quadgrams: u64,
    /// For English this is expected to be "tion".
    pub most_frequent_quadgram: String,
    /// Expected fitness of uniformly random text.
    pub average_fitness: f64,
    /// Weight of the most frequent quadgram.
    pub max_fitness: f64,
}

/// On-disk layout of a quadgram table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuadgramFile {
    pub alphabet: String,
    pub nbr_quadgrams: u64,
    pub most_frequent_quadgram: String,
    pub max_fitness: f64,
    pub average_fitness: f64,
    pub quadgrams: BTreeMap<String, f32>,
}
