//! Key-run parsing and the resolution cascade.
//!
//! A committed buffer is split into runs of keys, each optionally followed by
//! a number. Runs carrying a search marker select from a numbered search
//! listing; plain runs go through the cascade:
//!
//! 1. exact phrase key, selecting the requested slot;
//! 2. mnemonic decomposition in three-character windows, stopping early when
//!    the rest of the run is itself a phrase key;
//! 3. an exact lookup of the (shorter than three) leftover, only when no
//!    number was typed.

use crate::mnemonic::MnemonicTable;
use crate::phrase_index::{KeyPhraseIndex, SlotEntry};
use crate::tables::Tables;
use crate::word_index::KeyWordIndex;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static KEY_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"([a-zA-Z;/`]+)(\d+)?").unwrap());

/// Slot selected when a run carries no number.
pub const DEFAULT_SELECTION: u32 = 1;

/// Characters of a window: two for the cell, one for the offset.
pub const WINDOW: usize = 3;

const MARKERS: [char; 3] = [';', '/', '`'];

/// A run of keys with its optional trailing number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRun<'a> {
    pub keys: &'a str,
    pub number: Option<u32>,
}

impl KeyRun<'_> {
    pub fn selection(&self) -> u32 {
        self.number.unwrap_or(DEFAULT_SELECTION)
    }
}

/// Split a buffer into key runs. Characters outside the key alphabet separate
/// runs and are otherwise ignored.
pub fn split_runs(buffer: &str) -> Vec<KeyRun<'_>> {
    KEY_RUN
        .captures_iter(buffer)
        .filter_map(|caps| {
            let keys = caps.get(1)?.as_str();
            // overflowing numbers address no slot
            let number = caps
                .get(2)
                .map(|m| m.as_str().parse::<u32>().unwrap_or(u32::MAX));
            Some(KeyRun { keys, number })
        })
        .collect()
}

/// One row of a numbered phrase listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhraseMatch {
    pub number: usize,
    pub key: String,
    pub slot: u32,
    pub phrase: String,
}

/// One row of a numbered word listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordMatch {
    pub number: usize,
    pub key: String,
    pub word: String,
}

/// Every phrase whose key starts with `prefix`, numbered from 1 across keys
/// in alphabetical order and slots in ascending order.
pub fn phrase_prefix_matches(index: &KeyPhraseIndex, prefix: &str) -> Vec<PhraseMatch> {
    index
        .with_prefix(prefix)
        .flat_map(|(key, entries)| entries.iter().map(move |e| (key, e)))
        .enumerate()
        .map(|(i, (key, e))| PhraseMatch {
            number: i + 1,
            key: key.to_string(),
            slot: e.slot,
            phrase: e.phrase.clone(),
        })
        .collect()
}

/// Every word whose key starts with `prefix`. An empty prefix matches nothing.
pub fn word_prefix_matches(index: &KeyWordIndex, prefix: &str) -> Vec<WordMatch> {
    if prefix.is_empty() {
        return Vec::new();
    }
    number_words(index.with_prefix(prefix))
}

/// Every word registered under exactly `key`.
pub fn word_exact_matches(index: &KeyWordIndex, key: &str) -> Vec<WordMatch> {
    number_words(index.get(key).map(|words| (key, words)).into_iter())
}

fn number_words<'a>(groups: impl Iterator<Item = (&'a str, &'a [String])>) -> Vec<WordMatch> {
    groups
        .flat_map(|(key, words)| words.iter().map(move |w| (key, w)))
        .enumerate()
        .map(|(i, (key, word))| WordMatch {
            number: i + 1,
            key: key.to_string(),
            word: word.clone(),
        })
        .collect()
}

/// Result of windowed mnemonic decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decomposition {
    pub text: String,
    /// Characters left after the last full window; empty on early exit.
    pub leftover: String,
    /// The rest of the run matched a phrase key and was resolved.
    pub early_exit: bool,
}

/// Decode `run` window by window. After each window, if the remaining
/// characters form a phrase key, that key is resolved at `selection` and
/// decoding stops.
pub fn decompose(tables: &Tables, run: &str, selection: u32, miss: char) -> Decomposition {
    let chars: Vec<char> = run.chars().collect();
    let mut text = String::new();
    let mut pos = 0;
    while chars.len() - pos >= WINDOW {
        text.push(tables.mnemonic.lookup(&chars[pos..pos + WINDOW]).unwrap_or(miss));
        pos += WINDOW;
        let rest: String = chars[pos..].iter().collect();
        if tables.phrases.contains_key(&rest) {
            if let Some(phrase) = tables.phrases.phrase(&rest, selection) {
                text.push_str(phrase);
            }
            return Decomposition {
                text,
                leftover: String::new(),
                early_exit: true,
            };
        }
    }
    Decomposition {
        text,
        leftover: chars[pos..].iter().collect(),
        early_exit: false,
    }
}

/// Decode full windows of `keys` for display, without the early exit.
/// Returns the decoded glyphs and the undecoded remainder.
pub fn preview_windows<'a>(
    table: &MnemonicTable,
    keys: &'a str,
    miss: char,
) -> (String, &'a str) {
    let mut preview = String::new();
    let mut rest = keys;
    loop {
        let window: Vec<char> = rest.chars().take(WINDOW).collect();
        if window.len() < WINDOW {
            return (preview, rest);
        }
        preview.push(table.lookup(&window).unwrap_or(miss));
        let skip: usize = window.iter().map(|c| c.len_utf8()).sum();
        rest = &rest[skip..];
    }
}

fn nth<T>(items: Vec<T>, selection: u32) -> Option<T> {
    let index = usize::try_from(selection.checked_sub(1)?).ok()?;
    items.into_iter().nth(index)
}

fn strip_markers(keys: &str) -> String {
    keys.chars().filter(|c| !MARKERS.contains(c)).collect()
}

/// Resolve one run to output text. Misses resolve to an empty string.
pub fn resolve_run(tables: &Tables, run: &KeyRun<'_>, miss: char) -> String {
    let selection = run.selection();
    let keys = run.keys;

    if keys.contains('/') {
        let key = strip_markers(keys);
        return nth(word_exact_matches(&tables.words, &key), selection)
            .map(|m| m.word)
            .unwrap_or_default();
    }
    if keys.contains('`') {
        let prefix = strip_markers(keys);
        return nth(word_prefix_matches(&tables.words, &prefix), selection)
            .map(|m| m.word)
            .unwrap_or_default();
    }
    if keys.contains(';') {
        let prefix = strip_markers(keys);
        return nth(phrase_prefix_matches(&tables.phrases, &prefix), selection)
            .map(|m| m.phrase)
            .unwrap_or_default();
    }

    if tables.phrases.contains_key(keys) {
        return tables
            .phrases
            .phrase(keys, selection)
            .map(str::to_string)
            .unwrap_or_default();
    }

    let mut decoded = decompose(tables, keys, selection, miss);
    // A leftover that is a key already ended decomposition early, so this
    // only adds text if the early exit stops checking every boundary.
    if !decoded.early_exit && run.number.is_none() && !decoded.leftover.is_empty() {
        if let Some(phrase) = tables.phrases.phrase(&decoded.leftover, DEFAULT_SELECTION) {
            decoded.text.push_str(phrase);
        }
    }
    debug!(keys, selection, text = %decoded.text, "decomposed run");
    decoded.text
}

/// Resolve a whole committed buffer.
pub fn resolve_buffer(tables: &Tables, buffer: &str, miss: char) -> String {
    split_runs(buffer)
        .iter()
        .map(|run| resolve_run(tables, run, miss))
        .collect()
}

/// Owned copy of the entries under an exact phrase key.
pub fn exact_candidates(index: &KeyPhraseIndex, key: &str) -> Option<Vec<SlotEntry>> {
    index.get(key).map(<[SlotEntry]>::to_vec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mnemonic::{MnemonicCell, MnemonicTableBuilder, CELL_WIDTH, UNASSIGNED};
    use crate::phrase_index::KeyPhraseIndexBuilder;
    use crate::word_index::KeyWordIndexBuilder;

    fn tables() -> Tables {
        let mut phrases = KeyPhraseIndexBuilder::new();
        phrases.register("shi", Some(1), "事");
        phrases.register("shi", Some(2), "是");
        phrases.register("de", None, "的");
        phrases.register("ab", None, "阿");

        let mut cells = MnemonicTableBuilder::new();
        let mut row = [UNASSIGNED; CELL_WIDTH];
        row[0] = '甲';
        row[1] = '乙';
        cells.insert("aa", MnemonicCell::new(row));

        let mut words = KeyWordIndexBuilder::new();
        words.push("ni", "你");
        words.push("ni", "妳");
        words.push("nin", "您");

        Tables {
            phrases: phrases.build(),
            mnemonic: cells.build(),
            words: words.build(),
            ..Tables::default()
        }
    }

    fn run(keys: &str, number: Option<u32>) -> KeyRun<'_> {
        KeyRun { keys, number }
    }

    #[test]
    fn split_runs_pairs_keys_with_numbers() {
        let runs = split_runs("shi2de.aab;3");
        assert_eq!(
            runs,
            vec![run("shi", Some(2)), run("de", None), run("aab;", Some(3))]
        );
        assert_eq!(split_runs("123"), vec![]);
        assert_eq!(split_runs("a99999999999")[0].number, Some(u32::MAX));
    }

    #[test]
    fn exact_key_selects_slot() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("shi", Some(2)), '?'), "是");
        assert_eq!(resolve_run(&t, &run("shi", None), '?'), "事");
        assert_eq!(resolve_run(&t, &run("shi", Some(9)), '?'), "");
        assert_eq!(resolve_run(&t, &run("shi", Some(0)), '?'), "");
    }

    #[test]
    fn windows_decode_through_cells() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("aab", None), '?'), "乙");
        assert_eq!(resolve_run(&t, &run("aaaaab", None), '?'), "甲乙");
        assert_eq!(resolve_run(&t, &run("aa9", None), '?'), "?");
        assert_eq!(resolve_run(&t, &run("zzb", None), '?'), "?");
    }

    #[test]
    fn early_exit_resolves_remaining_key() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("aabshi", Some(2)), '?'), "乙是");
        let d = decompose(&t, "aabshi", 2, '?');
        assert!(d.early_exit);
        assert!(d.leftover.is_empty());
    }

    #[test]
    fn early_exit_only_at_window_boundaries() {
        let t = tables();
        // "de" starts mid-window ("aad" + "e"), so it is not picked up early
        let d = decompose(&t, "aade", 1, '?');
        assert!(!d.early_exit);
        assert_eq!(d.text, UNASSIGNED.to_string());
        assert_eq!(d.leftover, "e");
        // "aab" + "de": the remainder is a key at the boundary
        assert_eq!(resolve_run(&t, &run("aabde", None), '?'), "乙的");
    }

    #[test]
    fn trailing_key_uses_requested_number() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("aaaab", None), '?'), "甲阿");
        // "ab" has no slot 2
        assert_eq!(resolve_run(&t, &run("aaaab", Some(2)), '?'), "甲");
    }

    #[test]
    fn key_leftover_always_ends_decomposition_early() {
        let t = tables();
        let d = decompose(&t, "aaaab", 1, '?');
        assert!(d.early_exit);
        // a leftover that reaches the fallback is never a key
        let d = decompose(&t, "aaaz", 1, '?');
        assert!(!d.early_exit);
        assert_eq!(d.leftover, "z");
        assert_eq!(resolve_run(&t, &run("aaaz", None), '?'), "甲");
    }

    #[test]
    fn short_unknown_run_yields_nothing() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("zq", None), '?'), "");
        assert_eq!(resolve_run(&t, &run("zq", Some(3)), '?'), "");
    }

    #[test]
    fn marker_runs_select_from_listings() {
        let t = tables();
        assert_eq!(resolve_run(&t, &run("sh;", Some(2)), '?'), "是");
        assert_eq!(resolve_run(&t, &run("ni`", Some(3)), '?'), "您");
        assert_eq!(resolve_run(&t, &run("ni/", Some(2)), '?'), "妳");
        assert_eq!(resolve_run(&t, &run("ni/", Some(3)), '?'), "");
        assert_eq!(resolve_run(&t, &run("`", None), '?'), "");
    }

    #[test]
    fn prefix_listing_numbering() {
        let t = tables();
        let m = phrase_prefix_matches(&t.phrases, "");
        let numbered: Vec<(usize, &str)> = m.iter().map(|m| (m.number, m.phrase.as_str())).collect();
        assert_eq!(numbered, vec![(1, "阿"), (2, "的"), (3, "事"), (4, "是")]);
        assert!(word_prefix_matches(&t.words, "").is_empty());
        assert_eq!(word_exact_matches(&t.words, "nin").len(), 1);
    }

    #[test]
    fn preview_stops_before_partial_window() {
        let t = tables();
        assert_eq!(preview_windows(&t.mnemonic, "aabaa", '?'), ("乙".to_string(), "aa"));
        assert_eq!(preview_windows(&t.mnemonic, "ab", '?'), (String::new(), "ab"));
    }

    #[test]
    fn resolve_buffer_concatenates_runs() {
        let t = tables();
        assert_eq!(resolve_buffer(&t, "shi2de", '?'), "是的");
        assert_eq!(resolve_buffer(&t, "", '?'), "");
    }
}
