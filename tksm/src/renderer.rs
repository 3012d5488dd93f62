//! Line-oriented console output.
//!
//! [`Console`] turns engine [`Response`]s into text. It writes through any
//! `Write`, using `\r\n` line endings when the terminal is in raw mode.
//! Long phrase tables are paginated; the pager reads its keys from the same
//! [`InputSource`] as the session.

use crate::terminal::InputSource;
use crate::TksmConfig;
use std::io::{self, Write};
use tksm_core::mnemonic::COLUMN_HEADER;
use tksm_core::{Feedback, KeyEntries, PhraseMatch, Response, SlotEntry, WordMatch};
use unicode_width::UnicodeWidthStr;

const PAGE_PROMPT: &str = "--- press space to continue, q to quit ---";

pub struct Console<W: Write> {
    out: W,
    newline: &'static str,
    page_lines: usize,
    display_width: usize,
    hint_lines: Vec<String>,
    hint_after_commit: bool,
    startup_hint: Vec<String>,
}

impl<W: Write> Console<W> {
    pub fn new(out: W, config: &TksmConfig) -> Self {
        Self {
            out,
            newline: "\n",
            page_lines: config.page_lines.max(1),
            display_width: config.display_width,
            hint_lines: config.hint_lines.clone(),
            hint_after_commit: config.hint_after_commit,
            startup_hint: config.startup_hint.clone(),
        }
    }

    /// Use `\r\n` line endings, as needed in raw mode.
    pub fn raw(mut self) -> Self {
        self.newline = "\r\n";
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn line(&mut self, text: &str) -> io::Result<()> {
        write!(self.out, "{}{}", text, self.newline)
    }

    pub fn newline(&mut self) -> io::Result<()> {
        self.out.write_all(self.newline.as_bytes())
    }

    pub fn echo(&mut self, ch: char) -> io::Result<()> {
        match ch {
            '\t' | '\r' | '\u{3}' | '\u{4}' | '\u{8}' | '\u{7f}' => Ok(()),
            _ => write!(self.out, "{ch}"),
        }?;
        self.out.flush()
    }

    /// Rewrite the current line with the buffer contents.
    pub fn status(&mut self, buffer: &str) -> io::Result<()> {
        write!(self.out, "\rBuffer: {buffer}")?;
        self.out.flush()
    }

    pub fn hint(&mut self) -> io::Result<()> {
        self.newline()?;
        for line in &self.hint_lines {
            write!(self.out, "{}{}", line, self.newline)?;
        }
        self.out.flush()
    }

    /// The key-mapping guide followed by the hint chart.
    pub fn startup(&mut self) -> io::Result<()> {
        for line in &self.startup_hint {
            write!(self.out, "{}{}", line, self.newline)?;
        }
        self.hint()
    }

    /// Write `lines` a page at a time, waiting for space between pages.
    /// `q`, termination or end of input stops the listing.
    pub fn paginate(&mut self, lines: &[String], input: &mut dyn InputSource) -> io::Result<()> {
        let mut pages = lines.chunks(self.page_lines).peekable();
        while let Some(page) = pages.next() {
            for line in page {
                self.line(line)?;
            }
            if pages.peek().is_none() {
                break;
            }
            write!(self.out, "{PAGE_PROMPT}")?;
            self.out.flush()?;
            loop {
                match input.next_char()? {
                    Some(' ') => {
                        self.newline()?;
                        break;
                    }
                    Some('q') | Some('\u{3}') | Some('\u{4}') | None => {
                        self.newline()?;
                        return self.line("Exiting pagination.");
                    }
                    Some(_) => {}
                }
            }
        }
        Ok(())
    }

    /// Render one engine response. `buffer` is the engine buffer after the
    /// event was processed.
    pub fn render(
        &mut self,
        response: &Response,
        buffer: &str,
        input: &mut dyn InputSource,
    ) -> io::Result<()> {
        match response {
            Response::Exit => {
                self.newline()?;
                self.line("Exiting.")?;
            }
            Response::Ignored | Response::Updated => {}
            Response::Erased => self.status(buffer)?,
            Response::Table(rows) => {
                self.newline()?;
                self.line("Key2Ph Table:")?;
                let lines: Vec<String> = rows.iter().map(format_table_row).collect();
                self.paginate(&lines, input)?;
                self.status(buffer)?;
            }
            Response::PhraseListing(matches) => {
                if !matches.is_empty() {
                    self.newline()?;
                    for line in format_phrase_listing(matches) {
                        self.line(&line)?;
                    }
                }
                self.status(buffer)?;
            }
            Response::WordListing(matches) => {
                if !matches.is_empty() {
                    self.newline()?;
                    for line in format_word_listing(matches, self.display_width) {
                        self.line(&line)?;
                    }
                }
                self.status(buffer)?;
            }
            Response::Feedback(feedback) => self.feedback(feedback, buffer)?,
            Response::Hint => self.hint()?,
            Response::Committed(text) => {
                self.newline()?;
                self.line(&format!("Output: {text}"))?;
                if self.hint_after_commit {
                    self.hint()?;
                }
            }
        }
        self.out.flush()
    }

    fn feedback(&mut self, feedback: &Feedback, buffer: &str) -> io::Result<()> {
        if let Some(candidates) = &feedback.candidates {
            self.options(&candidates.entries, buffer)?;
        }
        write!(self.out, "{}", feedback.preview)?;
        if let Some(cell) = &feedback.cell {
            self.newline()?;
            self.line(COLUMN_HEADER)?;
            write!(self.out, "{} {}", cell.index, cell.row)?;
        }
        self.newline()?;
        self.status(buffer)?;
        if let Some(remainder) = &feedback.remainder {
            self.options(&remainder.entries, buffer)?;
        }
        Ok(())
    }

    fn options(&mut self, entries: &[SlotEntry], buffer: &str) -> io::Result<()> {
        self.newline()?;
        self.line("Options:")?;
        for entry in entries {
            self.line(&format!("{}: {}", entry.slot, entry.phrase))?;
        }
        self.status(buffer)
    }
}

/// `key: 1 是, 2 事`
pub fn format_table_row(row: &KeyEntries) -> String {
    let entries: Vec<String> = row
        .entries
        .iter()
        .map(|e| format!("{} {}", e.slot, e.phrase))
        .collect();
    format!("{}: {}", row.key, entries.join(", "))
}

/// `n: keySLOT phrase`, one line per match.
pub fn format_phrase_listing(matches: &[PhraseMatch]) -> Vec<String> {
    matches
        .iter()
        .map(|m| format!("{}: {}{} {}", m.number, m.key, m.slot, m.phrase))
        .collect()
}

/// Group matches by key and wrap each group to `width` display columns.
/// Every line starts with `key: `; a single entry wider than `width` gets a
/// line of its own.
pub fn format_word_listing(matches: &[WordMatch], width: usize) -> Vec<String> {
    let mut groups: Vec<(&str, Vec<String>)> = Vec::new();
    for m in matches {
        let entry = format!("{} {}", m.number, m.word);
        match groups.iter_mut().find(|(key, _)| *key == m.key) {
            Some((_, entries)) => entries.push(entry),
            None => groups.push((m.key.as_str(), vec![entry])),
        }
    }

    let mut lines = Vec::new();
    for (key, entries) in groups {
        let mut current = format!("{key}: ");
        let mut first = true;
        for entry in entries {
            if current.width() + entry.width() + 2 <= width {
                if !first {
                    current.push_str(", ");
                }
                current.push_str(&entry);
                first = false;
            } else {
                lines.push(current);
                current = format!("{key}: {entry}");
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::terminal::ReaderSource;

    fn word(number: usize, key: &str, word: &str) -> WordMatch {
        WordMatch {
            number,
            key: key.into(),
            word: word.into(),
        }
    }

    fn console() -> Console<Vec<u8>> {
        let config = TksmConfig {
            page_lines: 2,
            ..TksmConfig::default()
        };
        Console::new(Vec::new(), &config)
    }

    #[test]
    fn word_listing_wraps_by_display_width() {
        let matches = vec![
            word(1, "ni", "你"),
            word(2, "ni", "妳"),
            word(3, "ni", "尼"),
            word(4, "nin", "您"),
        ];
        // "ni: 1 你" is 8 columns wide, each further entry needs 6 more
        let lines = format_word_listing(&matches, 16);
        assert_eq!(lines, vec!["ni: 1 你, 2 妳", "ni: 3 尼", "nin: 4 您"]);
    }

    #[test]
    fn phrase_listing_lines() {
        let matches = vec![PhraseMatch {
            number: 1,
            key: "shi".into(),
            slot: 2,
            phrase: "是".into(),
        }];
        assert_eq!(format_phrase_listing(&matches), vec!["1: shi2 是"]);
    }

    #[test]
    fn startup_prints_guide_before_chart() {
        let mut c = console().raw();
        c.startup().unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        let guide = out.find("第二類").unwrap();
        let chart = out.find("ＡＢＣＤ").unwrap();
        assert!(guide < chart);
        assert!(out.starts_with("提示"));
        assert!(!out.replace("\r\n", "").contains('\n'));
    }

    #[test]
    fn pagination_stops_on_q() {
        let mut c = console();
        let lines: Vec<String> = (1..=5).map(|i| format!("line{i}")).collect();
        let mut input = ReaderSource::new(&b"xq"[..]);
        c.paginate(&lines, &mut input).unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        assert!(out.contains("line2"));
        assert!(!out.contains("line3"));
        assert!(out.ends_with("Exiting pagination.\n"));
    }

    #[test]
    fn pagination_continues_on_space() {
        let mut c = console();
        let lines: Vec<String> = (1..=5).map(|i| format!("line{i}")).collect();
        let mut input = ReaderSource::new(&b"  "[..]);
        c.paginate(&lines, &mut input).unwrap();
        let out = String::from_utf8(c.into_inner()).unwrap();
        assert!(out.contains("line5"));
        assert_eq!(out.matches(PAGE_PROMPT).count(), 2);
    }
}
