//! Glyph → leading romanization letter.
//!
//! Used to derive a lookup key for word-definition lines that do not name
//! one: the key is the concatenation of each glyph's leading letter.

use ahash::AHashMap;

/// Key used when none of a phrase's glyphs has a known romanization.
pub const FALLBACK_KEY: &str = "v";

#[derive(Debug, Clone, Default)]
pub struct RomanizationIndex {
    map: AHashMap<char, char>,
}

impl RomanizationIndex {
    pub fn get(&self, glyph: char) -> Option<char> {
        self.map.get(&glyph).copied()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Derive a key for `phrase`, or `None` if no glyph is known.
    pub fn derive_key(&self, phrase: &str) -> Option<String> {
        let key: String = phrase.chars().filter_map(|c| self.get(c)).collect();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    }
}

/// Builder where the first registration of a glyph wins.
#[derive(Debug, Default)]
pub struct RomanizationIndexBuilder {
    index: RomanizationIndex,
}

impl RomanizationIndexBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `glyph` as romanized by `key`. Empty keys are ignored.
    pub fn insert(&mut self, glyph: char, key: &str) {
        if let Some(letter) = key.chars().next() {
            self.index.map.entry(glyph).or_insert(letter);
        }
    }

    /// Entries registered so far.
    pub fn index(&self) -> &RomanizationIndex {
        &self.index
    }

    pub fn build(self) -> RomanizationIndex {
        self.index
    }
}
