//! Text buffer holding the characters committed so far.
//!
//! Multi-tap entry only ever edits the tail of the text, so the buffer has no
//! cursor: commits append, delete pops the last character, and finalize
//! replaces the whole content with the corrected text.

/// Committed text produced by the decoder.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextBuffer {
    text: String,
}

impl TextBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self {
            text: String::new(),
        }
    }

    /// Get the committed text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of characters (not bytes) in the buffer.
    pub fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a committed character.
    pub fn push(&mut self, ch: char) {
        self.text.push(ch);
    }

    /// Remove the last character.
    /// Returns the removed character, or `None` if the buffer was empty.
    pub fn delete_last(&mut self) -> Option<char> {
        self.text.pop()
    }

    /// Append a single space unless the buffer is empty.
    /// Returns true if a space was appended.
    pub fn push_space(&mut self) -> bool {
        if self.text.is_empty() {
            return false;
        }
        self.text.push(' ');
        true
    }

    /// Replace the whole content.
    pub fn replace(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delete_and_space_edges() {
        let mut buf = TextBuffer::new();
        assert_eq!(buf.delete_last(), None);
        assert!(!buf.push_space());
        assert_eq!(buf.text(), "");

        buf.push('A');
        buf.push('B');
        assert_eq!(buf.delete_last(), Some('B'));
        assert_eq!(buf.text(), "A");

        assert!(buf.push_space());
        assert_eq!(buf.text(), "A ");
    }

    #[test]
    fn delete_removes_whole_character() {
        let mut buf = TextBuffer::new();
        buf.push('É');
        assert_eq!(buf.char_len(), 1);
        assert_eq!(buf.delete_last(), Some('É'));
        assert!(buf.is_empty());
    }
}
