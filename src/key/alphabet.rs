use crate::consts::{DEFAULT_ALPHABET, MAX_SCORABLE_ALPHABET};
use crate::error::{SfResult, SubForgeError};
use crate::key::case::fold_str;
use std::collections::HashMap;
use std::fmt;
use strum_macros::{Display, EnumIter, EnumString};

const ASCII_NONE: u32 = u32::MAX;

/// Built-in alphabets for common languages.
#[derive(Debug, Clone, Copy, EnumIter, EnumString, Display, PartialEq, Eq, Hash)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum KnownAlphabet {
    Latin,
    German,
    Spanish,
    Swedish,
    Danish,
}

impl KnownAlphabet {
    pub fn get_str(&self) -> &'static str {
        match self {
            Self::Latin => DEFAULT_ALPHABET,
            Self::German => "abcdefghijklmnopqrstuvwxyzäöüß",
            Self::Spanish => "abcdefghijklmnñopqrstuvwxyz",
            Self::Swedish => "abcdefghijklmnopqrstuvwxyzåäö",
            Self::Danish => "abcdefghijklmnopqrstuvwxyzæøå",
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        // Presets are distinct and non-empty by construction.
        Alphabet::from_folded(self.get_str().chars().collect())
    }
}

/// Ordered set of distinct characters, stored in canonical (lower) case.
#[derive(Clone)]
pub struct Alphabet {
    chars: Vec<char>,
    ascii: [u32; 128],
    other: HashMap<char, u32>,
}

impl Alphabet {
    pub fn new(chars: &str) -> SfResult<Self> {
        let folded: Vec<char> = fold_str(chars).chars().collect();
        if folded.is_empty() {
            return Err(SubForgeError::Validation(
                "alphabet must not be empty".to_string(),
            ));
        }

        let mut seen = std::collections::HashSet::with_capacity(folded.len());
        for &c in &folded {
            if !seen.insert(c) {
                return Err(SubForgeError::Validation(format!(
                    "alphabet characters must be unique ('{}' repeats)",
                    c
                )));
            }
        }

        Ok(Self::from_folded(folded))
    }

    fn from_folded(chars: Vec<char>) -> Self {
        let mut ascii = [ASCII_NONE; 128];
        let mut other = HashMap::new();
        for (i, &c) in chars.iter().enumerate() {
            if c.is_ascii() {
                ascii[c as usize] = i as u32;
            } else {
                other.insert(c, i as u32);
            }
        }
        Self {
            chars,
            ascii,
            other,
        }
    }

    pub fn len(&self) -> usize {
        self.chars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn chars(&self) -> &[char] {
        &self.chars
    }

    pub fn char_at(&self, idx: usize) -> char {
        self.chars[idx]
    }

    /// Position of an already folded character.
    #[inline(always)]
    pub fn index_of(&self, c: char) -> Option<usize> {
        if c.is_ascii() {
            let i = self.ascii[c as usize];
            if i == ASCII_NONE {
                None
            } else {
                Some(i as usize)
            }
        } else {
            self.other.get(&c).map(|&i| i as usize)
        }
    }

    pub fn contains(&self, c: char) -> bool {
        self.index_of(c).is_some()
    }

    pub fn as_string(&self) -> String {
        self.chars.iter().collect()
    }

    /// Scoring and breaking pack symbols into 5 bits.
    pub fn ensure_scorable(&self) -> SfResult<()> {
        if self.len() > MAX_SCORABLE_ALPHABET {
            return Err(SubForgeError::Configuration(format!(
                "Alphabet must have less or equal than {} characters (got {})",
                MAX_SCORABLE_ALPHABET,
                self.len()
            )));
        }
        Ok(())
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        KnownAlphabet::Latin.alphabet()
    }
}

impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        self.chars == other.chars
    }
}

impl Eq for Alphabet {}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Alphabet({:?})", self.as_string())
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_string())
    }
}
