//! Table construction from definition sources.
//!
//! [`TableBuilder`] accepts sources one at a time, in the order they should
//! take priority, and produces the immutable [`Tables`] bundle consumed by the
//! decode engine. The romanization source must be added before word files so
//! that unkeyed phrases can be given a derived key.

use crate::definitions::{self, LoadReport, RomanizationFormat};
use crate::error::{Error, Result};
use crate::mnemonic::{MnemonicTable, MnemonicTableBuilder};
use crate::phrase_index::{KeyPhraseIndex, KeyPhraseIndexBuilder};
use crate::romanization::{RomanizationIndex, RomanizationIndexBuilder};
use crate::utils;
use crate::word_index::{KeyWordIndex, KeyWordIndexBuilder};
use crate::Config;
use std::path::{Path, PathBuf};
use tracing::info;

/// All lookup tables, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub romanization: RomanizationIndex,
    pub mnemonic: MnemonicTable,
    pub phrases: KeyPhraseIndex,
    pub words: KeyWordIndex,
}

/// Locations of the definition sources for one run.
#[derive(Debug, Clone)]
pub struct SourcePaths {
    /// Required `.cin` or `.lime` table.
    pub romanization: PathBuf,
    /// Word files, already in priority order.
    pub word_files: Vec<PathBuf>,
    /// Optional mnemonic table.
    pub mnemonic: Option<PathBuf>,
}

impl Tables {
    /// Load every source named in `paths`.
    ///
    /// A missing romanization source is fatal; a missing mnemonic table
    /// leaves that table empty.
    pub fn load(paths: &SourcePaths, config: &Config) -> Result<(Tables, LoadReport)> {
        let mut builder = TableBuilder::new(config);
        builder.add_romanization_file(&paths.romanization)?;
        for path in &paths.word_files {
            builder.add_word_file(path)?;
        }
        if let Some(path) = &paths.mnemonic {
            if path.exists() {
                builder.add_mnemonic_file(path)?;
            } else {
                info!("no mnemonic table at {}", path.display());
            }
        }
        Ok(builder.finish())
    }
}

pub struct TableBuilder {
    fallback_key: String,
    romanization: RomanizationIndexBuilder,
    mnemonic: MnemonicTableBuilder,
    phrases: KeyPhraseIndexBuilder,
    words: KeyWordIndexBuilder,
    report: LoadReport,
}

impl TableBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            fallback_key: config.fallback_key.clone(),
            romanization: RomanizationIndexBuilder::new(),
            mnemonic: MnemonicTableBuilder::new(),
            phrases: KeyPhraseIndexBuilder::new(),
            words: KeyWordIndexBuilder::new(),
            report: LoadReport::new(),
        }
    }

    pub fn add_romanization_file(&mut self, path: &Path) -> Result<()> {
        if !path.exists() {
            return Err(Error::MissingSource(path.to_path_buf()));
        }
        let text = read(path)?;
        let name = path.display().to_string();
        self.add_romanization_str(&name, RomanizationFormat::from_path(path), &text);
        Ok(())
    }

    pub fn add_romanization_str(&mut self, source: &str, format: RomanizationFormat, text: &str) {
        match format {
            RomanizationFormat::Cin => definitions::parse_cin(text, &mut self.romanization),
            RomanizationFormat::Lime => definitions::parse_lime(
                source,
                text,
                &mut self.romanization,
                &mut self.words,
                &mut self.report,
            ),
        }
        info!(
            source,
            glyphs = self.romanization.index().len(),
            "loaded romanization source"
        );
    }

    pub fn add_word_file(&mut self, path: &Path) -> Result<()> {
        let text = read(path)?;
        self.add_word_str(&path.display().to_string(), &text);
        Ok(())
    }

    /// Register every definition in a word file, in line order.
    pub fn add_word_str(&mut self, source: &str, text: &str) {
        let mut registered = 0usize;
        for (n, raw) in text.lines().enumerate() {
            let line = utils::normalize(raw);
            match definitions::parse_word_line(&line) {
                Ok(Some(def)) => {
                    let key = match def.key {
                        Some(key) => key,
                        None => self
                            .romanization
                            .index()
                            .derive_key(&def.phrase)
                            .unwrap_or_else(|| self.fallback_key.clone()),
                    };
                    if self.phrases.register(key, def.slot, &def.phrase) {
                        registered += 1;
                    }
                }
                Ok(None) => {}
                Err(reason) => self.report.record(source, n + 1, &line, reason),
            }
        }
        info!(source, registered, "loaded word source");
    }

    pub fn add_mnemonic_file(&mut self, path: &Path) -> Result<()> {
        let text = read(path)?;
        self.add_mnemonic_str(&path.display().to_string(), &text);
        Ok(())
    }

    pub fn add_mnemonic_str(&mut self, source: &str, text: &str) {
        definitions::parse_mnemonic(source, text, &mut self.mnemonic, &mut self.report);
    }

    pub fn finish(self) -> (Tables, LoadReport) {
        let tables = Tables {
            romanization: self.romanization.build(),
            mnemonic: self.mnemonic.build(),
            phrases: self.phrases.build(),
            words: self.words.build(),
        };
        info!(
            keys = tables.phrases.len(),
            phrases = tables.phrases.entry_count(),
            cells = tables.mnemonic.len(),
            "tables ready"
        );
        (tables, self.report)
    }
}

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| Error::io(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unkeyed_phrases_get_derived_or_fallback_keys() {
        let mut b = TableBuilder::new(&Config::default());
        b.add_romanization_str(
            "p.cin",
            RomanizationFormat::Cin,
            "%chardef begin\nzhong 中\nguo 國\n%chardef end\n",
        );
        b.add_word_str("word1.txt", "中國\nhello\n");
        let (t, report) = b.finish();
        assert!(report.is_clean());
        assert_eq!(t.phrases.phrase("zg", 1), Some("中國"));
        assert_eq!(t.phrases.phrase("v", 1), Some("hello"));
    }

    #[test]
    fn bad_word_lines_are_reported_and_skipped() {
        let mut b = TableBuilder::new(&Config::default());
        b.add_word_str("w.txt", "好 hao\n\"oops\n壞 huai0\n");
        let (t, report) = b.finish();
        assert_eq!(t.phrases.len(), 1);
        let lines: Vec<usize> = report.issues().iter().map(|i| i.line_number).collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn missing_romanization_source_is_fatal() {
        let paths = SourcePaths {
            romanization: PathBuf::from("/definitely/not/here.cin"),
            word_files: vec![],
            mnemonic: None,
        };
        let err = Tables::load(&paths, &Config::default()).unwrap_err();
        assert!(matches!(err, Error::MissingSource(_)));
    }
}
