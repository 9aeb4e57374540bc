//! Position arithmetic over rope buffers
//!
//! Positions are zero-based `(line, character)` pairs; `character` counts
//! Unicode scalar values within the line and never includes the terminator.
//! Every conversion validates its input and returns `None` outside the buffer.

use lsp_types::{Position, Range};
use ropey::Rope;
use std::ops;
use streamsql_core::word_spans;

/// Text of a line without its terminator
pub fn line_content(text: &Rope, line_idx: usize) -> Option<String> {
    if line_idx >= text.len_lines() {
        return None;
    }
    let mut line = text.line(line_idx).to_string();
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
    Some(line)
}

/// Char index of `position`
pub fn position_to_char(text: &Rope, position: Position) -> Option<usize> {
    LineCursor::at(text, position)?;
    Some(text.line_to_char(position.line as usize) + position.character as usize)
}

/// A validated cursor: the content of its line and the byte offset within it
///
/// Words are located with [`word_spans`], so prefixes and hover words split
/// exactly where the tokenizer splits identifiers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCursor {
    pub line: u32,
    pub content: String,
    pub offset: usize,
}

impl LineCursor {
    /// `None` when the line does not exist or the column is past its end
    pub fn at(text: &Rope, position: Position) -> Option<Self> {
        let content = line_content(text, position.line as usize)?;
        let column = position.character as usize;
        let offset = match content.char_indices().nth(column) {
            Some((offset, _)) => offset,
            None if content.chars().count() == column => content.len(),
            None => return None,
        };
        Some(Self {
            line: position.line,
            content,
            offset,
        })
    }

    fn char_range(&self, bytes: ops::Range<usize>) -> Range {
        let start = self.content[..bytes.start].chars().count() as u32;
        let end = start + self.content[bytes].chars().count() as u32;
        Range::new(Position::new(self.line, start), Position::new(self.line, end))
    }

    fn prefix_bytes(&self) -> ops::Range<usize> {
        word_spans(&self.content)
            .find(|span| span.start < self.offset && self.offset <= span.end)
            .map_or(self.offset..self.offset, |span| span.start..self.offset)
    }

    /// Range from the start of the word being typed up to the cursor
    ///
    /// Empty when the cursor does not follow a word character.
    pub fn prefix_range(&self) -> Range {
        self.char_range(self.prefix_bytes())
    }

    pub fn prefix(&self) -> String {
        self.content[self.prefix_bytes()].to_string()
    }

    /// Word containing the character at the cursor and its range
    pub fn word_at(&self) -> Option<(String, Range)> {
        let span = word_spans(&self.content)
            .find(|span| span.start <= self.offset && self.offset < span.end)?;
        Some((self.content[span.clone()].to_string(), self.char_range(span)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn char_range(line: u32, start: u32, end: u32) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    fn word_at(text: &str, character: u32) -> Option<(String, Range)> {
        LineCursor::at(&Rope::from_str(text), Position::new(0, character))?.word_at()
    }

    #[test]
    fn test_line_content_strips_terminators() {
        let text = Rope::from_str("SELECT 1\r\nFROM demo\n");
        assert_eq!(line_content(&text, 0).as_deref(), Some("SELECT 1"));
        assert_eq!(line_content(&text, 1).as_deref(), Some("FROM demo"));
        assert_eq!(line_content(&text, 2).as_deref(), Some(""));
        assert_eq!(line_content(&text, 3), None);
    }

    #[test]
    fn test_cursor_rejects_out_of_range() {
        let text = Rope::from_str("abc");
        assert!(LineCursor::at(&text, Position::new(0, 3)).is_some());
        assert!(LineCursor::at(&text, Position::new(0, 4)).is_none());
        assert!(LineCursor::at(&text, Position::new(1, 0)).is_none());
    }

    #[test]
    fn test_prefix_range_counts_chars() {
        let text = Rope::from_str("SELECT 'é', ag");
        let cursor = LineCursor::at(&text, Position::new(0, 14)).unwrap();
        assert_eq!(cursor.prefix(), "ag");
        assert_eq!(cursor.prefix_range(), char_range(0, 12, 14));
    }

    #[test]
    fn test_prefix_empty_after_space() {
        let text = Rope::from_str("SELECT ");
        let cursor = LineCursor::at(&text, Position::new(0, 7)).unwrap();
        assert_eq!(cursor.prefix(), "");
        assert_eq!(cursor.prefix_range(), char_range(0, 7, 7));
    }

    #[test]
    fn test_word_at_requires_containment() {
        let text = Rope::from_str("avg(x) ");
        let cursor = LineCursor::at(&text, Position::new(0, 1)).unwrap();
        assert_eq!(
            cursor.word_at(),
            Some(("avg".to_string(), char_range(0, 0, 3)))
        );

        // Just past the word is adjacent, not inside.
        let cursor = LineCursor::at(&text, Position::new(0, 3)).unwrap();
        assert_eq!(cursor.word_at(), None);

        let cursor = LineCursor::at(&text, Position::new(0, 7)).unwrap();
        assert_eq!(cursor.word_at(), None);
    }

    #[test]
    fn test_word_at_stops_where_tokens_stop() {
        assert_eq!(
            word_at("SELECT 2avg(x)", 9),
            Some(("avg".to_string(), char_range(0, 8, 11)))
        );
        assert_eq!(word_at("SELECT 2avg(x)", 7), None);
        assert_eq!(
            word_at("SELECT éavg(x)", 8),
            Some(("avg".to_string(), char_range(0, 8, 11)))
        );
        assert_eq!(
            word_at("SELECT avgé(x)", 7),
            Some(("avg".to_string(), char_range(0, 7, 10)))
        );
        assert_eq!(word_at("SELECT avgé(x)", 10), None);
    }

    #[test]
    fn test_prefix_excludes_leading_digits() {
        let text = Rope::from_str("SELECT 2ag");
        let cursor = LineCursor::at(&text, Position::new(0, 10)).unwrap();
        assert_eq!(cursor.prefix(), "ag");
        assert_eq!(cursor.prefix_range(), char_range(0, 8, 10));
    }

    #[test]
    fn test_position_to_char_on_second_line() {
        let text = Rope::from_str("a\nbcd");
        assert_eq!(position_to_char(&text, Position::new(1, 2)), Some(4));
        assert_eq!(position_to_char(&text, Position::new(1, 3)), Some(5));
        assert_eq!(position_to_char(&text, Position::new(1, 4)), None);
    }
}
