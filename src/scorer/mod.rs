pub mod builder;
pub mod engine;
pub mod loader;
pub mod types;

pub use self::builder::ModelBuilder;
pub use self::types::{ModelInfo, QuadgramFile};

use self::engine::Window;
use crate::consts::QUADGRAM_LEN;
use crate::error::{SfResult, SubForgeError};
use crate::key::case::fold_char;
use crate::key::Alphabet;
use std::io::BufRead;

/// Weight reported for quadgrams never seen during generation.
pub const UNSEEN_WEIGHT: f32 = 0.0;

/// Immutable quadgram statistics for one language.
///
/// Weights live in a dense table indexed by four 5-bit alphabet symbols, so
/// scoring a window is a single shift-or and lookup. Share it between searches
/// behind an `Arc`; it is never mutated after construction.
pub struct QuadgramModel {
    alphabet: Alphabet,
    table: Vec<f32>,
    // Packed indices of observed quadgrams, ascending.
    observed: Vec<u32>,
    info: ModelInfo,
}

impl QuadgramModel {
    pub(crate) fn from_parts(
        alphabet: Alphabet,
        table: Vec<f32>,
        observed: Vec<u32>,
        info: ModelInfo,
    ) -> Self {
        Self {
            alphabet,
            table,
            observed,
            info,
        }
    }

    /// Scans a corpus and builds a model over `alphabet`.
    pub fn generate<R: BufRead>(corpus: R, alphabet: Alphabet) -> SfResult<Self> {
        let mut builder = ModelBuilder::new(alphabet)?;
        builder.feed_reader(corpus)?;
        builder.build()
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    #[inline(always)]
    pub fn table(&self) -> &[f32] {
        &self.table
    }

    pub fn observed_count(&self) -> usize {
        self.observed.len()
    }

    pub(crate) fn observed(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.observed
            .iter()
            .map(move |&idx| (idx as usize, self.table[idx as usize]))
    }

    /// Weight of a single quadgram; unseen quadgrams get [`UNSEEN_WEIGHT`].
    pub fn weight(&self, quadgram: &str) -> SfResult<f32> {
        let symbols = engine::to_symbols(quadgram, &self.alphabet);
        if symbols.len() != QUADGRAM_LEN || quadgram.chars().count() != QUADGRAM_LEN {
            return Err(SubForgeError::Input(format!(
                "'{}' is not a quadgram over the alphabet",
                quadgram
            )));
        }
        Ok(self.table[engine::pack(&symbols)])
    }

    /// Mean quadgram weight of the text after case folding and dropping
    /// characters outside the alphabet.
    ///
    /// Text in the modelled language scores around 100. Lower values indicate
    /// more random text; values well above 100 indicate nonsense built from
    /// very frequent quadgrams (e.g. `tionioningatheling`).
    pub fn fitness(&self, text: &str) -> SfResult<f64> {
        let symbols = engine::to_symbols(text, &self.alphabet);
        self.fitness_of_symbols(&symbols)
    }

    pub fn fitness_of_symbols(&self, symbols: &[u8]) -> SfResult<f64> {
        let windows = engine::window_count(symbols.len());
        if windows == 0 {
            return Err(too_short());
        }
        Ok(engine::window_sum(&self.table, symbols) / windows as f64)
    }

    /// Same as [`fitness`](Self::fitness) but reads the text line by line.
    pub fn fitness_reader<R: BufRead>(&self, mut reader: R) -> SfResult<f64> {
        let mut window = Window::default();
        let mut sum = 0.0f64;
        let mut windows = 0u64;
        let mut line = String::new();

        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            for c in line.chars() {
                if let Some(sym) = self.alphabet.index_of(fold_char(c)) {
                    if let Some(idx) = window.push(sym as u8) {
                        sum += self.table[idx] as f64;
                        windows += 1;
                    }
                }
            }
        }

        if windows == 0 {
            return Err(too_short());
        }
        Ok(sum / windows as f64)
    }

    /// Heaviest quadgrams, ties broken alphabetically.
    pub fn top_quadgrams(&self, n: usize) -> Vec<(String, f32)> {
        let mut entries: Vec<(usize, f32)> = self.observed().collect();
        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        entries
            .into_iter()
            .take(n)
            .map(|(idx, w)| (engine::unpack(idx, &self.alphabet), w))
            .collect()
    }
}

fn too_short() -> SubForgeError {
    SubForgeError::Input(
        "More than three characters from the given alphabet are required".to_string(),
    )
}

impl std::fmt::Debug for QuadgramModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuadgramModel")
            .field("info", &self.info)
            .field("observed", &self.observed.len())
            .finish()
    }
}
