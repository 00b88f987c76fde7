use super::engine::{self, Window};
use super::{ModelInfo, QuadgramModel, UNSEEN_WEIGHT};
use crate::consts::{FITNESS_SCALE, QUADGRAM_LEN, QUADGRAM_TABLE_SIZE, UNSEEN_COUNT_DIVISOR};
use crate::error::{SfResult, SubForgeError};
use crate::key::case::fold_char;
use crate::key::Alphabet;
use std::io::BufRead;
use tracing::{debug, info};

/// Accumulates quadgram counts from one or more corpora.
///
/// Each `feed_*` call is a separate source: windows never span two sources.
pub struct ModelBuilder {
    alphabet: Alphabet,
    counts: Vec<u64>,
    total: u64,
    sources: usize,
}

impl ModelBuilder {
    pub fn new(alphabet: Alphabet) -> SfResult<Self> {
        alphabet.ensure_scorable()?;
        Ok(Self {
            alphabet,
            counts: vec![0; QUADGRAM_TABLE_SIZE],
            total: 0,
            sources: 0,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    /// Windows counted so far.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn feed_str(&mut self, text: &str) -> &mut Self {
        let mut window = Window::default();
        self.scan(&mut window, text);
        self.sources += 1;
        self
    }

    pub fn feed_reader<R: BufRead>(&mut self, mut reader: R) -> SfResult<&mut Self> {
        let mut window = Window::default();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            self.scan(&mut window, &line);
        }
        self.sources += 1;
        Ok(self)
    }

    fn scan(&mut self, window: &mut Window, text: &str) {
        for c in text.chars() {
            if let Some(sym) = self.alphabet.index_of(fold_char(c)) {
                if let Some(idx) = window.push(sym as u8) {
                    self.counts[idx] += 1;
                    self.total += 1;
                }
            }
        }
    }

    /// Turns the counts into weights.
    ///
    /// A quadgram seen `c` times gets `v = ln(10 * c / c_min)`, so the rarest
    /// one still sits well above the unseen floor. Weights are then scaled so
    /// the count-weighted mean of `v` over the corpus maps to 100.
    pub fn build(self) -> SfResult<QuadgramModel> {
        if self.total == 0 {
            return Err(SubForgeError::Input(
                "corpus contains no quadgram of the alphabet".to_string(),
            ));
        }

        let observed: Vec<u32> = self
            .counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .map(|(idx, _)| idx as u32)
            .collect();

        let total = self.total as f64;
        let c_min = observed
            .iter()
            .map(|&idx| self.counts[idx as usize])
            .min()
            .unwrap_or(1) as f64;

        let log_weight = |c: u64| (UNSEEN_COUNT_DIVISOR * c as f64 / c_min).ln();

        let norm: f64 = observed
            .iter()
            .map(|&idx| {
                let c = self.counts[idx as usize];
                (c as f64 / total) * log_weight(c)
            })
            .sum();

        let mut table = vec![UNSEEN_WEIGHT; QUADGRAM_TABLE_SIZE];
        let mut weight_sum = 0.0f64;
        for &idx in &observed {
            let w = FITNESS_SCALE * log_weight(self.counts[idx as usize]) / norm;
            table[idx as usize] = w as f32;
            weight_sum += w;
        }

        // Strict `>` keeps the lowest index on ties.
        let mut best = observed[0] as usize;
        for &idx in &observed[1..] {
            if self.counts[idx as usize] > self.counts[best] {
                best = idx as usize;
            }
        }

        let space = (self.alphabet.len() as f64).powi(QUADGRAM_LEN as i32);
        let info = ModelInfo {
            alphabet: self.alphabet.as_string(),
            nbr_quadgrams: self.total,
            most_frequent_quadgram: engine::unpack(best, &self.alphabet),
            average_fitness: weight_sum / space,
            max_fitness: table[best] as f64,
        };

        debug!(
            sources = self.sources,
            distinct = observed.len(),
            c_min,
            "Quadgram counts collected"
        );
        info!(
            "Generated quadgram model: {} windows, most frequent '{}'",
            info.nbr_quadgrams, info.most_frequent_quadgram
        );

        Ok(QuadgramModel::from_parts(self.alphabet, table, observed, info))
    }
}
