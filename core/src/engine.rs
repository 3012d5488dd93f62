//! Decode engine: session state and per-event dispatch.
//!
//! `DecodeEngine` owns the mutable state of one interactive session (pending
//! buffer, consumed boundary, numeric accumulator, output accumulator) and
//! shares the read-only [`Tables`]. Each input event is classified and
//! dispatched by [`DecodeEngine::process`], which returns a [`Response`]
//! describing what the front end should display. The engine performs no I/O.

use crate::event::{InputEvent, Trigger};
use crate::input_buffer::InputBuffer;
use crate::phrase_index::SlotEntry;
use crate::resolve::{self, PhraseMatch, WordMatch};
use crate::tables::Tables;
use crate::Config;
use std::sync::Arc;
use tracing::debug;

/// Entries listed under one phrase key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEntries {
    pub key: String,
    pub entries: Vec<SlotEntry>,
}

/// A full mnemonic cell shown while its two-letter index is pending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRow {
    pub index: String,
    pub row: String,
}

/// Live feedback after a buffer character.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Feedback {
    /// Candidates when the pending keys are exactly a phrase key.
    pub candidates: Option<KeyEntries>,
    /// Glyphs decoded from the full windows of the pending keys.
    pub preview: String,
    /// Cell row when exactly two keys are left after the windows.
    pub cell: Option<CellRow>,
    /// Candidates when the keys left after the windows form a phrase key.
    pub remainder: Option<KeyEntries>,
}

/// What the front end should show after an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// The session ended; nothing was committed.
    Exit,
    /// Nothing changed.
    Ignored,
    /// The buffer grew without anything to list.
    Updated,
    /// The last buffer character was removed.
    Erased,
    /// Phrase table rows, possibly restricted to a prefix.
    Table(Vec<KeyEntries>),
    PhraseListing(Vec<PhraseMatch>),
    WordListing(Vec<WordMatch>),
    Feedback(Feedback),
    Hint,
    /// Resolved text of a commit; the session is reset.
    Committed(String),
}

pub struct DecodeEngine {
    tables: Arc<Tables>,
    config: Config,
    buffer: InputBuffer,
    /// Digits typed since the last non-digit.
    number: u64,
    /// Resolved text pending commit.
    output: String,
}

impl DecodeEngine {
    pub fn new(tables: Arc<Tables>, config: Config) -> Self {
        Self {
            tables,
            config,
            buffer: InputBuffer::new(),
            number: 0,
            output: String::new(),
        }
    }

    /// Everything typed since the last commit.
    pub fn buffer(&self) -> &str {
        self.buffer.text()
    }

    /// Keys after the last number.
    pub fn pending(&self) -> &str {
        self.buffer.pending()
    }

    pub fn number(&self) -> u64 {
        self.number
    }

    /// Discard all session state.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.number = 0;
        self.output.clear();
    }

    /// Classify and process one raw character.
    pub fn process_char(&mut self, ch: char) -> Response {
        self.process(InputEvent::classify(ch))
    }

    /// Process one input event.
    pub fn process(&mut self, event: InputEvent) -> Response {
        match event {
            InputEvent::Terminate => {
                self.reset();
                Response::Exit
            }
            InputEvent::Digit(d) => {
                self.number = self.number.saturating_mul(10).saturating_add(u64::from(d));
                self.buffer.push(char::from(b'0' + d));
                self.buffer.consume_all();
                Response::Updated
            }
            InputEvent::Erase => {
                if self.buffer.pop() {
                    Response::Erased
                } else {
                    Response::Ignored
                }
            }
            InputEvent::Trigger(trigger) => self.trigger(trigger),
            InputEvent::Commit => self.commit(),
            InputEvent::Hint => Response::Hint,
            InputEvent::Literal(ch) => {
                self.buffer.push(ch);
                self.number = 0;
                Response::Feedback(self.feedback())
            }
        }
    }

    fn trigger(&mut self, trigger: Trigger) -> Response {
        let tables = Arc::clone(&self.tables);
        let pending = self.buffer.pending();
        let response = match trigger {
            Trigger::FullTable => {
                let mut rows = table_rows(tables.phrases.with_prefix(pending));
                if pending.is_empty() || rows.is_empty() {
                    rows = table_rows(tables.phrases.iter());
                }
                // the table trigger never enters the buffer
                return Response::Table(rows);
            }
            Trigger::PhrasePrefix => {
                Response::PhraseListing(resolve::phrase_prefix_matches(&tables.phrases, pending))
            }
            Trigger::WordPrefix => {
                if pending.is_empty() {
                    return Response::Ignored;
                }
                Response::WordListing(resolve::word_prefix_matches(&tables.words, pending))
            }
            Trigger::WordExact => {
                Response::WordListing(resolve::word_exact_matches(&tables.words, pending))
            }
        };
        self.buffer.push(trigger.as_char());
        response
    }

    fn commit(&mut self) -> Response {
        let miss = self.config.miss_glyph;
        for run in resolve::split_runs(self.buffer.text()) {
            let text = resolve::resolve_run(&self.tables, &run, miss);
            self.output.push_str(&text);
        }
        debug!(buffer = self.buffer.text(), output = %self.output, "commit");
        let committed = std::mem::take(&mut self.output);
        self.reset();
        Response::Committed(committed)
    }

    fn feedback(&self) -> Feedback {
        let tables = &self.tables;
        let pending = self.buffer.pending();
        let entries_for = |key: &str| {
            resolve::exact_candidates(&tables.phrases, key).map(|entries| KeyEntries {
                key: key.to_string(),
                entries,
            })
        };

        let (preview, rest) =
            resolve::preview_windows(&tables.mnemonic, pending, self.config.miss_glyph);
        let cell = if rest.chars().count() == 2 {
            tables.mnemonic.cell(rest).map(|c| CellRow {
                index: rest.to_string(),
                row: c.row(),
            })
        } else {
            None
        };
        let remainder = if rest.len() < pending.len() {
            entries_for(rest)
        } else {
            None
        };

        Feedback {
            candidates: entries_for(pending),
            preview,
            cell,
            remainder,
        }
    }
}

fn table_rows<'a>(rows: impl Iterator<Item = (&'a str, &'a [SlotEntry])>) -> Vec<KeyEntries> {
    rows.map(|(key, entries)| KeyEntries {
        key: key.to_string(),
        entries: entries.to_vec(),
    })
    .collect()
}
