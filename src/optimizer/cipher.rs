use crate::consts::QUADGRAM_LEN;
use crate::error::{SfResult, SubForgeError};
use crate::key::Alphabet;
use crate::scorer::engine;

/// Ciphertext reduced to alphabet symbols, with the positions of every symbol
/// so a swap only touches the windows it changes.
#[derive(Debug, Clone)]
pub struct PreparedCipher {
    symbols: Vec<u8>,
    positions: Vec<Vec<usize>>,
}

impl PreparedCipher {
    pub fn new(ciphertext: &str, alphabet: &Alphabet) -> SfResult<Self> {
        let symbols = engine::to_symbols(ciphertext, alphabet);
        if symbols.len() < QUADGRAM_LEN {
            return Err(SubForgeError::Input(format!(
                "ciphertext is too short ({} usable characters, at least {} required)",
                symbols.len(),
                QUADGRAM_LEN
            )));
        }

        let mut positions = vec![Vec::new(); alphabet.len()];
        for (p, &s) in symbols.iter().enumerate() {
            positions[s as usize].push(p);
        }

        Ok(Self { symbols, positions })
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline(always)]
    pub fn positions(&self, symbol: usize) -> &[usize] {
        &self.positions[symbol]
    }

    pub fn alphabet_len(&self) -> usize {
        self.positions.len()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn window_count(&self) -> usize {
        engine::window_count(self.symbols.len())
    }
}
