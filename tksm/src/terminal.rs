//! Character-at-a-time input sources.
//!
//! The session loop reads one character per event. [`TerminalSource`] puts
//! the terminal into raw mode and translates key events into the control
//! codes the engine classifies (Ctrl-C/Ctrl-D → 3/4, Backspace → 127).
//! [`ReaderSource`] decodes UTF-8 from any reader, for piped input and tests.

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, Read};

pub trait InputSource {
    /// Next input character, or `None` at end of input.
    fn next_char(&mut self) -> io::Result<Option<char>>;
}

/// Raw-mode terminal input. Raw mode is left when the source is dropped.
pub struct TerminalSource {
    _private: (),
}

impl TerminalSource {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self { _private: () })
    }
}

impl Drop for TerminalSource {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl InputSource for TerminalSource {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        loop {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(ch) = key_to_char(key.code, key.modifiers) {
                    return Ok(Some(ch));
                }
            }
        }
    }
}

/// Map a key press to the character a cooked-mode terminal would send.
pub fn key_to_char(code: KeyCode, modifiers: KeyModifiers) -> Option<char> {
    match code {
        KeyCode::Char(c) if modifiers.contains(KeyModifiers::CONTROL) => {
            match c.to_ascii_lowercase() {
                'c' => Some('\u{3}'),
                'd' => Some('\u{4}'),
                'h' => Some('\u{8}'),
                _ => None,
            }
        }
        KeyCode::Char(c) => Some(c),
        KeyCode::Backspace => Some('\u{7f}'),
        KeyCode::Tab => Some('\t'),
        KeyCode::Enter => Some('\r'),
        _ => None,
    }
}

/// UTF-8 characters from a reader. Invalid sequences yield U+FFFD.
pub struct ReaderSource<R> {
    reader: R,
}

impl<R: Read> ReaderSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: Read> InputSource for ReaderSource<R> {
    fn next_char(&mut self) -> io::Result<Option<char>> {
        let mut buf = [0u8; 4];
        if self.reader.read(&mut buf[..1])? == 0 {
            return Ok(None);
        }
        let width = match buf[0] {
            0x00..=0x7f => 1,
            0xc0..=0xdf => 2,
            0xe0..=0xef => 3,
            0xf0..=0xf7 => 4,
            _ => return Ok(Some(char::REPLACEMENT_CHARACTER)),
        };
        if width > 1 {
            if let Err(e) = self.reader.read_exact(&mut buf[1..width]) {
                return match e.kind() {
                    io::ErrorKind::UnexpectedEof => Ok(Some(char::REPLACEMENT_CHARACTER)),
                    _ => Err(e),
                };
            }
        }
        let ch = std::str::from_utf8(&buf[..width])
            .ok()
            .and_then(|s| s.chars().next())
            .unwrap_or(char::REPLACEMENT_CHARACTER);
        Ok(Some(ch))
    }
}
