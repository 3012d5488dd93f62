//! Pending key buffer with a consumed-boundary marker.
//!
//! The buffer stores every key typed since the last commit (letters, digits
//! and search markers). The boundary marks where the current, not yet
//! numbered, key run starts: typing a digit moves it to the end of the
//! buffer, so lookups while typing only see the keys after the last number.

/// Input buffer tracking raw keys and the consumed boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputBuffer {
    text: String,
    boundary: usize, // Byte offset, not char offset
}

impl InputBuffer {
    /// Create a new empty input buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw input text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Keys after the consumed boundary.
    pub fn pending(&self) -> &str {
        &self.text[self.boundary..]
    }

    /// Byte offset of the consumed boundary.
    pub fn boundary(&self) -> usize {
        self.boundary
    }

    /// Length of the buffer in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clear the buffer and reset the boundary.
    pub fn clear(&mut self) {
        self.text.clear();
        self.boundary = 0;
    }

    /// Append a character at the end.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Mark everything typed so far as consumed.
    pub fn consume_all(&mut self) {
        self.boundary = self.text.len();
    }

    /// Remove the last character, clamping the boundary.
    /// Returns true if a character was removed.
    pub fn pop(&mut self) -> bool {
        if self.text.pop().is_none() {
            return false;
        }
        self.boundary = self.boundary.min(self.text.len());
        true
    }
}
