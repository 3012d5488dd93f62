//! Classification of raw input characters.

/// Transient listing modes entered by a trigger character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// `~`: dump the phrase table.
    FullTable,
    /// `;`: numbered prefix search over phrases.
    PhrasePrefix,
    /// `` ` ``: numbered prefix search over words.
    WordPrefix,
    /// `/`: numbered exact search over words.
    WordExact,
}

impl Trigger {
    pub fn from_char(ch: char) -> Option<Self> {
        match ch {
            '~' => Some(Self::FullTable),
            ';' => Some(Self::PhrasePrefix),
            '`' => Some(Self::WordPrefix),
            '/' => Some(Self::WordExact),
            _ => None,
        }
    }

    /// The trigger character.
    pub fn as_char(self) -> char {
        match self {
            Self::FullTable => '~',
            Self::PhrasePrefix => ';',
            Self::WordPrefix => '`',
            Self::WordExact => '/',
        }
    }
}

/// One classified input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Ctrl-C / Ctrl-D
    Terminate,
    /// Backspace / DEL
    Erase,
    /// Space
    Commit,
    /// Decimal digit with its value
    Digit(u8),
    Trigger(Trigger),
    /// Tab: show the hint chart
    Hint,
    /// Any other character
    Literal(char),
}

impl InputEvent {
    pub fn classify(ch: char) -> Self {
        match ch {
            '\u{3}' | '\u{4}' => Self::Terminate,
            '\u{8}' | '\u{7f}' => Self::Erase,
            ' ' => Self::Commit,
            '\t' => Self::Hint,
            '0'..='9' => Self::Digit(ch as u8 - b'0'),
            _ => match Trigger::from_char(ch) {
                Some(trigger) => Self::Trigger(trigger),
                None => Self::Literal(ch),
            },
        }
    }
}

impl From<char> for InputEvent {
    fn from(ch: char) -> Self {
        Self::classify(ch)
    }
}
