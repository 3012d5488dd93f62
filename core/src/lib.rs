//! tksm-core
//!
//! Tables, parsers and the decode engine behind the tksm phonetic/mnemonic
//! text-entry resolver. The crate performs no terminal I/O; front ends feed
//! characters to a [`DecodeEngine`] and render the [`Response`]s it returns.
//!
//! Public API:
//! - `Tables` / `TableBuilder` - Load definition sources into read-only indexes
//! - `KeyPhraseIndex` - Key → numbered phrase slots (key2ph)
//! - `KeyWordIndex` - Key → ordered word list (keys2word)
//! - `MnemonicTable` - Two-letter cells of 26 glyphs
//! - `RomanizationIndex` - Glyph → leading romanization letter
//! - `DecodeEngine` - Interactive session state and dispatch
//! - `Config` - Engine configuration
use serde::{Deserialize, Serialize};

pub mod error;
pub use error::{Error, Result};

pub mod phrase_index;
pub use phrase_index::{KeyPhraseIndex, KeyPhraseIndexBuilder, SlotEntry};

pub mod word_index;
pub use word_index::{KeyWordIndex, KeyWordIndexBuilder};

pub mod romanization;
pub use romanization::{RomanizationIndex, RomanizationIndexBuilder};

pub mod mnemonic;
pub use mnemonic::{MnemonicCell, MnemonicTable, MnemonicTableBuilder};

pub mod definitions;
pub use definitions::{FormatIssue, LoadReport, RomanizationFormat};

pub mod tables;
pub use tables::{SourcePaths, TableBuilder, Tables};

pub mod input_buffer;
pub use input_buffer::InputBuffer;

pub mod event;
pub use event::{InputEvent, Trigger};

pub mod resolve;
pub use resolve::{PhraseMatch, WordMatch};

pub mod engine;
pub use engine::{CellRow, DecodeEngine, Feedback, KeyEntries, Response};

/// Engine configuration.
///
/// Front ends embed this in their own config (see the `tksm` crate) and
/// pass it to [`TableBuilder`] and [`DecodeEngine`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Glyph emitted for a mnemonic window that resolves to nothing.
    pub miss_glyph: char,
    /// Key given to unkeyed phrases none of whose glyphs is romanized.
    pub fallback_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            miss_glyph: '?',
            fallback_key: romanization::FALLBACK_KEY.to_string(),
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string.
    pub fn from_toml_str(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_fill_missing_fields() {
        let cfg = Config::from_toml_str("miss_glyph = '□'").unwrap();
        assert_eq!(cfg.miss_glyph, '□');
        assert_eq!(cfg.fallback_key, "v");
    }

    #[test]
    fn config_toml_roundtrip() {
        let cfg = Config::default();
        let text = cfg.to_toml_string().unwrap();
        assert_eq!(Config::from_toml_str(&text).unwrap(), cfg);
    }

    #[test]
    fn normalize_composes_and_trims() {
        assert_eq!(utils::normalize("  e\u{301} "), "é");
    }
}
