use std::ops::RangeInclusive;

/// Alphabet used when none is given.
pub const DEFAULT_ALPHABET: &str = "abcdefghijklmnopqrstuvwxyz";

/// Scoring packs every character into 5 bits, which caps scorable alphabets at 32 characters.
pub const MAX_SCORABLE_ALPHABET: usize = 32;

pub const BITS_PER_SYMBOL: usize = 5;

pub const QUADGRAM_LEN: usize = 4;

/// Number of slots in the dense quadgram table (32^4).
pub const QUADGRAM_TABLE_SIZE: usize = 1 << (BITS_PER_SYMBOL * QUADGRAM_LEN);

/// Keeps the three most recent symbols of a rolling window.
pub const WINDOW_KEEP_MASK: usize = (1 << (BITS_PER_SYMBOL * (QUADGRAM_LEN - 1))) - 1;

/// Text written in the modelled language scores around this value.
pub const FITNESS_SCALE: f64 = 100.0;

/// Unseen quadgrams are treated as if they occurred this many times less often
/// than the rarest observed quadgram.
pub const UNSEEN_COUNT_DIVISOR: f64 = 10.0;

pub const DEFAULT_CONSOLIDATE: usize = 3;
pub const CONSOLIDATE_RANGE: RangeInclusive<usize> = 1..=30;

pub const DEFAULT_MAX_TRIES: usize = 1000;
pub const MAX_TRIES_RANGE: RangeInclusive<usize> = 1..=10_000;
