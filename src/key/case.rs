//! Case canonicalisation shared by transcoding, scoring and corpus scanning.
//!
//! Text is folded once into a canonical (lower) case while remembering which
//! characters were upper case; the inverse pass restores that case on the
//! substituted characters. Characters whose case mapping is not a single
//! character (e.g. `ß` -> `SS`) are left as they are.

/// Folds a single character to its canonical case.
///
/// A character is only folded if upper-casing the result gives it back, so
/// signs like KELVIN SIGN or capital `ẞ` stay themselves and never match a
/// lower-case alphabet letter.
#[inline]
pub fn fold_char(c: char) -> char {
    if c.is_ascii() {
        return c.to_ascii_lowercase();
    }
    match single(c.to_lowercase()) {
        Some(f) if f == c || unfold_char(f, true) == c => f,
        _ => c,
    }
}

/// Restores upper case on a canonical character if that is a 1:1 mapping.
#[inline]
pub fn unfold_char(c: char, upper: bool) -> char {
    if !upper {
        return c;
    }
    if c.is_ascii() {
        return c.to_ascii_uppercase();
    }
    single(c.to_uppercase()).unwrap_or(c)
}

fn single<I: Iterator<Item = char>>(mut it: I) -> Option<char> {
    let first = it.next()?;
    if it.next().is_some() {
        None
    } else {
        Some(first)
    }
}

/// Folds every character of a string (used for alphabets and keys).
pub fn fold_str(s: &str) -> String {
    s.chars().map(fold_char).collect()
}

/// Text split into its canonical form plus an upper-case mask.
#[derive(Debug, Clone)]
pub struct FoldedText {
    source: Vec<char>,
    folded: Vec<char>,
    upper_mask: Vec<bool>,
}

impl FoldedText {
    pub fn new(text: &str) -> Self {
        let source: Vec<char> = text.chars().collect();
        let mut folded = Vec::with_capacity(source.len());
        let mut upper_mask = Vec::with_capacity(source.len());

        for &c in &source {
            let f = fold_char(c);
            folded.push(f);
            upper_mask.push(f != c);
        }

        Self {
            source,
            folded,
            upper_mask,
        }
    }

    pub fn folded(&self) -> &[char] {
        &self.folded
    }

    pub fn len(&self) -> usize {
        self.folded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.folded.is_empty()
    }

    /// Rebuilds the text. `map` receives each canonical character and returns
    /// its canonical replacement, or `None` to keep the source character as-is.
    pub fn rebuild<F>(&self, mut map: F) -> String
    where
        F: FnMut(char) -> Option<char>,
    {
        let mut out = String::with_capacity(self.source.len());
        for i in 0..self.folded.len() {
            match map(self.folded[i]) {
                Some(c) => out.push(unfold_char(c, self.upper_mask[i])),
                None => out.push(self.source[i]),
            }
        }
        out
    }
}
