use crate::consts::{BITS_PER_SYMBOL, QUADGRAM_LEN, WINDOW_KEEP_MASK};
use crate::key::case::fold_char;
use crate::key::Alphabet;

/// Maps text onto alphabet symbols, dropping everything outside the alphabet.
pub fn to_symbols(text: &str, alphabet: &Alphabet) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    extend_symbols(&mut out, text, alphabet);
    out
}

pub fn extend_symbols(out: &mut Vec<u8>, text: &str, alphabet: &Alphabet) {
    out.extend(
        text.chars()
            .filter_map(|c| alphabet.index_of(fold_char(c)))
            .map(|i| i as u8),
    );
}

#[inline(always)]
pub fn pack(symbols: &[u8]) -> usize {
    symbols
        .iter()
        .take(QUADGRAM_LEN)
        .fold(0usize, |acc, &s| (acc << BITS_PER_SYMBOL) | s as usize)
}

/// Inverse of [`pack`] for a 4-symbol index.
pub fn unpack(idx: usize, alphabet: &Alphabet) -> String {
    let mut chars = ['\0'; QUADGRAM_LEN];
    let mut rest = idx;
    for slot in chars.iter_mut().rev() {
        *slot = alphabet.char_at(rest & 0x1F);
        rest >>= BITS_PER_SYMBOL;
    }
    chars.iter().collect()
}

/// Rolling 4-symbol window over a symbol stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct Window {
    packed: usize,
    filled: usize,
}

impl Window {
    /// Pushes one symbol; returns the packed quadgram once four symbols are in.
    #[inline(always)]
    pub fn push(&mut self, symbol: u8) -> Option<usize> {
        self.packed = ((self.packed & WINDOW_KEEP_MASK) << BITS_PER_SYMBOL) | symbol as usize;
        if self.filled < QUADGRAM_LEN - 1 {
            self.filled += 1;
            None
        } else {
            Some(self.packed)
        }
    }
}

/// Number of overlapping quadgram windows in `len` symbols.
#[inline]
pub fn window_count(len: usize) -> usize {
    len.saturating_sub(QUADGRAM_LEN - 1)
}

/// Sum of table weights over every window. Caller guarantees `symbols.len() >= 4`.
#[inline(always)]
pub fn window_sum(table: &[f32], symbols: &[u8]) -> f64 {
    let mut idx = pack(&symbols[..QUADGRAM_LEN - 1]);
    let mut sum = 0.0f64;
    for &s in &symbols[QUADGRAM_LEN - 1..] {
        idx = ((idx & WINDOW_KEEP_MASK) << BITS_PER_SYMBOL) | s as usize;
        sum += table[idx] as f64;
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::QUADGRAM_TABLE_SIZE;

    #[test]
    fn test_pack_unpack() {
        let a = Alphabet::default();
        let syms = to_symbols("tion", &a);
        assert_eq!(unpack(pack(&syms), &a), "tion");
    }

    #[test]
    fn test_window_matches_pack() {
        let a = Alphabet::default();
        let syms = to_symbols("The quick", &a);
        let mut w = Window::default();
        let packed: Vec<usize> = syms.iter().filter_map(|&s| w.push(s)).collect();
        assert_eq!(packed.len(), window_count(syms.len()));
        assert_eq!(packed[0], pack(&syms[0..4]));
        assert_eq!(packed[packed.len() - 1], pack(&syms[syms.len() - 4..]));
    }

    #[test]
    fn test_window_sum_counts_each_window() {
        let mut table = vec![0.0f32; QUADGRAM_TABLE_SIZE];
        let a = Alphabet::default();
        let syms = to_symbols("abcabc", &a);
        table[pack(&syms[0..4])] = 1.0;
        table[pack(&syms[1..5])] = 2.0;
        table[pack(&syms[2..6])] = 4.0;
        assert_eq!(window_sum(&table, &syms), 7.0);
    }
}
