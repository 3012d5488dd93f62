//! Line parsers for the definition sources.
//!
//! Supported formats:
//! - `.cin` romanization tables (`%chardef begin` … `%chardef end`)
//! - `.lime` comma-separated `key,word` tables
//! - word files: `phrase [key][number]` or `"quoted phrase" [key][number]`
//! - mnemonic tables: `<two letters> <26 glyphs>`, `##` comments
//!
//! Parsers never fail on bad content. Lines that do not have the expected
//! shape are recorded in a [`LoadReport`] and skipped.

use crate::mnemonic::{MnemonicCell, MnemonicTableBuilder};
use crate::romanization::RomanizationIndexBuilder;
use crate::word_index::KeyWordIndexBuilder;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::path::Path;
use tracing::{debug, warn};

static CIN_CHARDEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z]*\d*)\s+([\x{4E00}-\x{9FFF}]+):?.*$").unwrap());

static LIME_CHARDEF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([a-zA-Z]*\d*),([\x{4E00}-\x{9FFF}]+):?.*$").unwrap());

static QUOTED_PHRASE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^"((?:[^"\\]|\\.)*)"\s*(.*)$"#).unwrap());

static KEY_AND_SLOT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-zA-Z]+)(\d*)$").unwrap());

static MNEMONIC_ROW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^([a-z]{2})\s+(.{26})$").unwrap());

const CHARDEF_BEGIN: &str = "%chardef begin";
const CHARDEF_END: &str = "%chardef end";

/// A definition line that was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatIssue {
    pub source: String,
    pub line_number: usize,
    pub line: String,
    pub reason: &'static str,
}

impl fmt::Display for FormatIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {}: {}",
            self.source, self.line_number, self.reason, self.line
        )
    }
}

/// Issues collected while loading definition sources.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    issues: Vec<FormatIssue>,
}

impl LoadReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, source: &str, line_number: usize, line: &str, reason: &'static str) {
        warn!(source, line_number, reason, "skipping definition line: {}", line);
        self.issues.push(FormatIssue {
            source: source.to_string(),
            line_number,
            line: line.to_string(),
            reason,
        });
    }

    pub fn issues(&self) -> &[FormatIssue] {
        &self.issues
    }

    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Format of a romanization source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RomanizationFormat {
    Cin,
    Lime,
}

impl RomanizationFormat {
    /// Pick the format from the file extension; anything but `.lime` is cin.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("lime") => Self::Lime,
            _ => Self::Cin,
        }
    }
}

/// Parse a `.cin` table into the romanization index.
pub fn parse_cin(text: &str, romanization: &mut RomanizationIndexBuilder) {
    let mut in_chardef = false;
    for line in text.lines().map(str::trim) {
        if line == CHARDEF_BEGIN {
            in_chardef = true;
            continue;
        }
        if line == CHARDEF_END {
            break;
        }
        if !in_chardef {
            continue;
        }
        match CIN_CHARDEF.captures(line) {
            Some(caps) => add_chardef(romanization, &caps[1], &caps[2]),
            None => debug!("cin entry without ideographs: {}", line),
        }
    }
}

/// Parse a `.lime` table into the word index and the romanization index.
pub fn parse_lime(
    source: &str,
    text: &str,
    romanization: &mut RomanizationIndexBuilder,
    words: &mut KeyWordIndexBuilder,
    report: &mut LoadReport,
) {
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut fields = line.split(',');
        match (fields.next(), fields.next()) {
            (Some(key), Some(word)) => words.push(key, word),
            _ => report.record(source, n + 1, line, "expected key,word"),
        }
        if let Some(caps) = LIME_CHARDEF.captures(line) {
            add_chardef(romanization, &caps[1], &caps[2]);
        }
    }
}

fn add_chardef(romanization: &mut RomanizationIndexBuilder, key: &str, glyphs: &str) {
    if let Some(glyph) = glyphs.chars().next() {
        romanization.insert(glyph, key);
    }
}

/// One parsed word-definition line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordDefinition {
    pub phrase: String,
    /// Explicit key; derived from the romanization index when absent.
    pub key: Option<String>,
    /// Explicit slot number.
    pub slot: Option<u32>,
}

/// Parse one word-definition line. Blank lines give `Ok(None)`.
pub fn parse_word_line(line: &str) -> Result<Option<WordDefinition>, &'static str> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let (phrase, rest) = if line.starts_with('"') {
        let caps = QUOTED_PHRASE
            .captures(line)
            .ok_or("unterminated quoted phrase")?;
        (unescape(&caps[1]), caps[2].trim().to_string())
    } else {
        match line.split_once(char::is_whitespace) {
            Some((phrase, rest)) => (phrase.to_string(), rest.trim().to_string()),
            None => (line.to_string(), String::new()),
        }
    };

    let mut key = None;
    let mut slot = None;
    if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
        slot = Some(parse_slot(&rest)?);
    } else if let Some(caps) = KEY_AND_SLOT.captures(&rest) {
        key = Some(caps[1].to_string());
        if !caps[2].is_empty() {
            slot = Some(parse_slot(&caps[2])?);
        }
    } else if !rest.is_empty() {
        debug!("ignoring unrecognized annotation {:?} for {:?}", rest, phrase);
    }

    Ok(Some(WordDefinition { phrase, key, slot }))
}

fn parse_slot(digits: &str) -> Result<u32, &'static str> {
    match digits.parse::<u32>() {
        Ok(0) => Err("slot numbers start at 1"),
        Ok(n) => Ok(n),
        Err(_) => Err("slot number out of range"),
    }
}

/// Resolve `\"`, `\t` and `\n` inside a quoted phrase.
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('"') => out.push('"'),
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}

/// Parse a mnemonic table file.
pub fn parse_mnemonic(
    source: &str,
    text: &str,
    table: &mut MnemonicTableBuilder,
    report: &mut LoadReport,
) {
    for (n, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("##") {
            continue;
        }
        let Some(caps) = MNEMONIC_ROW.captures(line) else {
            report.record(source, n + 1, line, "invalid mnemonic row");
            continue;
        };
        let glyphs: Vec<char> = caps[2].chars().collect();
        match MnemonicCell::from_glyphs(&glyphs) {
            Some(cell) => table.insert(&caps[1], cell),
            None => report.record(source, n + 1, line, "invalid mnemonic row"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(phrase: &str, key: Option<&str>, slot: Option<u32>) -> Option<WordDefinition> {
        Some(WordDefinition {
            phrase: phrase.to_string(),
            key: key.map(str::to_string),
            slot,
        })
    }

    #[test]
    fn word_line_shapes() {
        assert_eq!(parse_word_line("是"), Ok(word("是", None, None)));
        assert_eq!(parse_word_line("是 2"), Ok(word("是", None, Some(2))));
        assert_eq!(parse_word_line("是\tshi"), Ok(word("是", Some("shi"), None)));
        assert_eq!(parse_word_line("是  shi12"), Ok(word("是", Some("shi"), Some(12))));
        assert_eq!(parse_word_line("   "), Ok(None));
    }

    #[test]
    fn unrecognized_annotation_keeps_phrase() {
        assert_eq!(parse_word_line("是 shi 2"), Ok(word("是", None, None)));
    }

    #[test]
    fn quoted_phrases_with_escapes() {
        assert_eq!(
            parse_word_line(r#""hello world" hw"#),
            Ok(word("hello world", Some("hw"), None))
        );
        assert_eq!(
            parse_word_line(r#""say \"hi\"\tnow\n" q3"#),
            Ok(word("say \"hi\"\tnow\n", Some("q"), Some(3)))
        );
        assert_eq!(parse_word_line(r#""a b""#), Ok(word("a b", None, None)));
        assert!(parse_word_line(r#""never closed"#).is_err());
    }

    #[test]
    fn zero_and_huge_slots_are_rejected() {
        assert!(parse_word_line("是 shi0").is_err());
        assert!(parse_word_line("是 99999999999").is_err());
    }

    #[test]
    fn cin_reads_only_chardef_section() {
        let text = "%gen_inp\n中 zz\n%chardef begin\nzhong 中\nguo 國:1\n, ，\n%chardef end\nxx 外\n";
        let mut b = RomanizationIndexBuilder::new();
        parse_cin(text, &mut b);
        let idx = b.build();
        assert_eq!(idx.get('中'), Some('z'));
        assert_eq!(idx.get('國'), Some('g'));
        assert_eq!(idx.get('外'), None);
    }

    #[test]
    fn lime_feeds_both_indexes() {
        let text = "ni,你\nni,妳\nhello,哈囉\nbroken\n";
        let mut roman = RomanizationIndexBuilder::new();
        let mut words = KeyWordIndexBuilder::new();
        let mut report = LoadReport::new();
        parse_lime("t.lime", text, &mut roman, &mut words, &mut report);
        let words = words.build();
        assert_eq!(words.get("ni").unwrap(), ["你", "妳"]);
        assert_eq!(roman.build().get('哈'), Some('h'));
        assert_eq!(report.issues().len(), 1);
        assert_eq!(report.issues()[0].line_number, 4);
    }

    #[test]
    fn mnemonic_rows_and_bad_lines() {
        let good = format!("aa {}", "甲".repeat(26));
        let short = format!("ab {}", "乙".repeat(25));
        let text = format!("## header\n\n{good}\n{short}\nAB {}\n", "丙".repeat(26));
        let mut b = MnemonicTableBuilder::new();
        let mut report = LoadReport::new();
        parse_mnemonic("m.txt", &text, &mut b, &mut report);
        let t = b.build();
        assert_eq!(t.len(), 1);
        assert_eq!(t.cell("aa").unwrap().glyph(25), Some('甲'));
        assert_eq!(report.issues().len(), 2);
    }
}
