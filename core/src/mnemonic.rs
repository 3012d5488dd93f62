//! Mnemonic glyph table.
//!
//! A cell is addressed by a two-letter index and holds one glyph per letter
//! `a`..=`z`. A three-character code `xyz` therefore names the glyph in cell
//! `xy` at offset `z - 'a'`.

use serde::Serialize;
use std::collections::BTreeMap;

/// Number of slots in every cell.
pub const CELL_WIDTH: usize = 26;

/// Glyph stored in slots the table generator left unassigned.
pub const UNASSIGNED: char = '﹏';

/// Column header printed above cell rows.
pub const COLUMN_HEADER: &str = "## ＡＢＣＤＥＦＧＨＩＪＫＬＭＮＯＰＱＲＳＴＵＶＷＸＹＺ";

/// One 26-slot row of the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MnemonicCell {
    glyphs: Vec<char>,
}

impl MnemonicCell {
    pub fn new(glyphs: [char; CELL_WIDTH]) -> Self {
        Self {
            glyphs: glyphs.to_vec(),
        }
    }

    /// Build a cell from exactly [`CELL_WIDTH`] glyphs.
    pub fn from_glyphs(glyphs: &[char]) -> Option<Self> {
        let arr: [char; CELL_WIDTH] = glyphs.try_into().ok()?;
        Some(Self::new(arr))
    }

    pub fn glyph(&self, offset: usize) -> Option<char> {
        self.glyphs.get(offset).copied()
    }

    /// The whole row as a string.
    pub fn row(&self) -> String {
        self.glyphs.iter().collect()
    }
}

/// Offset addressed by a letter, `a` = 0.
pub fn letter_offset(ch: char) -> Option<usize> {
    if ch.is_ascii_lowercase() {
        Some((ch as u8 - b'a') as usize)
    } else {
        None
    }
}

#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct MnemonicTable {
    cells: BTreeMap<String, MnemonicCell>,
}

impl MnemonicTable {
    pub fn cell(&self, index: &str) -> Option<&MnemonicCell> {
        self.cells.get(index)
    }

    /// Glyph named by a three-character code, or `None` on any miss.
    pub fn lookup(&self, code: &[char]) -> Option<char> {
        let [a, b, offset] = code else {
            return None;
        };
        let index: String = [*a, *b].iter().collect();
        self.cells.get(&index)?.glyph(letter_offset(*offset)?)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MnemonicCell)> {
        self.cells.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[derive(Debug, Default)]
pub struct MnemonicTableBuilder {
    cells: BTreeMap<String, MnemonicCell>,
}

impl MnemonicTableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Later lines for the same index replace earlier ones.
    pub fn insert<K: Into<String>>(&mut self, index: K, cell: MnemonicCell) {
        self.cells.insert(index.into(), cell);
    }

    pub fn build(self) -> MnemonicTable {
        MnemonicTable { cells: self.cells }
    }
}
