pub mod alphabet;
pub mod case;

pub use self::alphabet::{Alphabet, KnownAlphabet};

use self::case::{fold_str, FoldedText};
use crate::error::{SfResult, SubForgeError};
use fastrand::Rng;
use std::collections::HashSet;
use std::fmt;
use std::io::{BufRead, Write};

/// A monoalphabetic substitution: position `i` of the key replaces position `i`
/// of the alphabet.
///
/// ```
/// use subforge::key::SubstitutionKey;
///
/// let key = SubstitutionKey::with_default_alphabet("zebrascdfghijklmnopqtuvwxy").unwrap();
/// assert_eq!(key.encode("flee at once"), "siaa zq lkba");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct SubstitutionKey {
    alphabet: Alphabet,
    key: Vec<char>,
    // alphabet index -> alphabet index of the substitute
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl SubstitutionKey {
    pub fn new(key: &str, alphabet: Alphabet) -> SfResult<Self> {
        let key: Vec<char> = fold_str(key).chars().collect();

        let unique: HashSet<char> = key.iter().copied().collect();
        if unique.len() != key.len() {
            return Err(SubForgeError::Validation(
                "key characters must be unique".to_string(),
            ));
        }
        if key.len() != alphabet.len() {
            return Err(SubForgeError::Validation(format!(
                "key must be as long as the alphabet ({} vs {})",
                key.len(),
                alphabet.len()
            )));
        }

        let mut forward = Vec::with_capacity(key.len());
        for &c in &key {
            match alphabet.index_of(c) {
                Some(idx) => forward.push(idx),
                None => {
                    return Err(SubForgeError::Validation(format!(
                        "key must use the same set of characters as the alphabet ('{}' is not in it)",
                        c
                    )))
                }
            }
        }

        let mut inverse = vec![0; forward.len()];
        for (i, &f) in forward.iter().enumerate() {
            inverse[f] = i;
        }

        Ok(Self {
            alphabet,
            key,
            forward,
            inverse,
        })
    }

    pub fn with_default_alphabet(key: &str) -> SfResult<Self> {
        Self::new(key, Alphabet::default())
    }

    /// Builds a key from a keyword: its distinct characters first, then the rest
    /// of the alphabet in order.
    pub fn from_keyword(keyword: &str, alphabet: Alphabet) -> SfResult<Self> {
        let mut used = vec![false; alphabet.len()];
        let mut key = String::with_capacity(alphabet.len());

        for c in fold_str(keyword).chars() {
            let idx = alphabet.index_of(c).ok_or_else(|| {
                SubForgeError::Validation(format!(
                    "keyword character '{}' is not part of the alphabet",
                    c
                ))
            })?;
            if !used[idx] {
                used[idx] = true;
                key.push(c);
            }
        }
        for (idx, &c) in alphabet.chars().iter().enumerate() {
            if !used[idx] {
                key.push(c);
            }
        }

        Self::new(&key, alphabet)
    }

    pub fn random(alphabet: Alphabet, rng: &mut Rng) -> Self {
        let mut forward: Vec<usize> = (0..alphabet.len()).collect();
        rng.shuffle(&mut forward);
        Self::from_indices(alphabet, forward)
    }

    /// `forward` must be a permutation of `0..alphabet.len()`.
    pub(crate) fn from_indices(alphabet: Alphabet, forward: Vec<usize>) -> Self {
        debug_assert_eq!(forward.len(), alphabet.len());
        let mut inverse = vec![0; forward.len()];
        for (i, &f) in forward.iter().enumerate() {
            inverse[f] = i;
        }
        Self {
            key: forward.iter().map(|&i| alphabet.char_at(i)).collect(),
            alphabet,
            forward,
            inverse,
        }
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn key(&self) -> String {
        self.key.iter().collect()
    }

    pub fn encode(&self, plaintext: &str) -> String {
        self.transcode(plaintext, &self.forward)
    }

    pub fn decode(&self, ciphertext: &str) -> String {
        self.transcode(ciphertext, &self.inverse)
    }

    pub fn encode_stream<R: BufRead, W: Write>(&self, reader: R, writer: W) -> SfResult<()> {
        self.transcode_stream(reader, writer, &self.forward)
    }

    pub fn decode_stream<R: BufRead, W: Write>(&self, reader: R, writer: W) -> SfResult<()> {
        self.transcode_stream(reader, writer, &self.inverse)
    }

    fn transcode(&self, text: &str, table: &[usize]) -> String {
        let folded = FoldedText::new(text);
        folded.rebuild(|c| {
            self.alphabet
                .index_of(c)
                .map(|idx| self.alphabet.char_at(table[idx]))
        })
    }

    fn transcode_stream<R: BufRead, W: Write>(
        &self,
        mut reader: R,
        mut writer: W,
        table: &[usize],
    ) -> SfResult<()> {
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            writer.write_all(self.transcode(&line, table).as_bytes())?;
        }
        writer.flush()?;
        Ok(())
    }
}

impl fmt::Debug for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubstitutionKey")
            .field("alphabet", &self.alphabet.as_string())
            .field("key", &self.key())
            .finish()
    }
}

impl fmt::Display for SubstitutionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}
