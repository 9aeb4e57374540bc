//! Rope-backed text buffer for Stream SQL documents.
//!
//! ## Offsets and positions
//!
//! - **Offset**: a UTF-8 byte offset from the start of the buffer, the unit
//!   token and highlight ranges use. Offsets must fall on char boundaries.
//! - **Position**: an [`lsp_types::Position`], the unit completion and hover
//!   requests use. `character` counts chars within the line.
//!
//! Only `\n` separates lines; a `\r` before it belongs to the line terminator.

use anyhow::{Result, anyhow};
use lsp_types::Position;
use ropey::Rope;
use std::ops::Range;
use std::time::SystemTime;
use streamsql_core::StreamSqlError;
use streamsql_lsp::position::{line_content, position_to_char};

/// A single edit made to the buffer.
///
/// Recorded for every [`TextBuffer`] mutation so the host can forward
/// didChange notifications or build undo history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Byte offset where the change starts
    pub offset: usize,

    /// Removed text (empty for pure insertions)
    pub old_text: String,

    /// Inserted text (empty for pure deletions)
    pub new_text: String,

    pub timestamp: SystemTime,
}

impl Change {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, String::new(), text)
    }

    pub fn delete(offset: usize, text: impl Into<String>) -> Self {
        Self::replace(offset, text, String::new())
    }

    pub fn replace(offset: usize, old_text: impl Into<String>, new_text: impl Into<String>) -> Self {
        Self {
            offset,
            old_text: old_text.into(),
            new_text: new_text.into(),
            timestamp: SystemTime::now(),
        }
    }

    pub fn is_insertion(&self) -> bool {
        self.old_text.is_empty() && !self.new_text.is_empty()
    }

    pub fn is_deletion(&self) -> bool {
        !self.old_text.is_empty() && self.new_text.is_empty()
    }

    pub fn is_replacement(&self) -> bool {
        !self.old_text.is_empty() && !self.new_text.is_empty()
    }

    /// Byte range the change replaced
    pub fn range(&self) -> Range<usize> {
        self.offset..self.offset + self.old_text.len()
    }

    /// Byte range of the inserted text after the change
    pub fn new_range(&self) -> Range<usize> {
        self.offset..self.offset + self.new_text.len()
    }
}

/// Document text with change tracking.
///
/// # Examples
///
/// ```
/// use streamsql_text_editor::buffer::TextBuffer;
///
/// let mut buffer = TextBuffer::new("SELECT *\nFROM demo");
/// assert_eq!(buffer.line_count(), 2);
/// assert_eq!(buffer.line(1), Some("FROM demo".to_string()));
///
/// buffer.insert(7, "temp, ").unwrap();
/// assert_eq!(buffer.text(), "SELECT temp, *\nFROM demo");
/// assert!(buffer.changes()[0].is_insertion());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextBuffer {
    rope: Rope,
    changes: Vec<Change>,
}

impl TextBuffer {
    pub fn new(text: impl AsRef<str>) -> Self {
        Self {
            rope: Rope::from_str(text.as_ref()),
            changes: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// The underlying rope, as handed to language providers
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Length in bytes
    pub fn len(&self) -> usize {
        self.rope.len_bytes()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_bytes() == 0
    }

    /// Number of lines; an empty buffer and a trailing newline each count
    /// a final empty line
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Line content without its terminator
    pub fn line(&self, line_idx: usize) -> Option<String> {
        line_content(&self.rope, line_idx)
    }

    /// Byte offset of the start of a line
    pub fn line_to_byte(&self, line_idx: usize) -> Option<usize> {
        (line_idx < self.rope.len_lines()).then(|| self.rope.line_to_byte(line_idx))
    }

    /// Line containing a byte offset; the buffer end belongs to the last line
    pub fn byte_to_line(&self, offset: usize) -> Option<usize> {
        (offset <= self.rope.len_bytes()).then(|| self.rope.byte_to_line(offset))
    }

    /// Insert `text` at byte `offset`.
    ///
    /// Fails when the offset is past the end or not on a char boundary.
    pub fn insert(&mut self, offset: usize, text: impl AsRef<str>) -> Result<()> {
        let text = text.as_ref();
        let char_idx = self.char_index(offset)?;
        self.rope.insert(char_idx, text);
        self.changes.push(Change::insert(offset, text));
        tracing::trace!(offset, len = text.len(), "Buffer insert");
        Ok(())
    }

    /// Delete the given byte range.
    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        self.replace(range, "")
    }

    /// Replace the given byte range with `text`.
    pub fn replace(&mut self, range: Range<usize>, text: impl AsRef<str>) -> Result<()> {
        let text = text.as_ref();
        let chars = self.char_range(&range)?;
        let old_text = self.rope.slice(chars.clone()).to_string();

        self.rope.remove(chars.clone());
        self.rope.insert(chars.start, text);
        self.changes.push(Change::replace(range.start, old_text, text));
        tracing::trace!(?range, len = text.len(), "Buffer replace");
        Ok(())
    }

    /// Convert a line/character position to a byte offset
    pub fn position_to_offset(&self, position: Position) -> Result<usize> {
        let char_idx = position_to_char(&self.rope, position).ok_or(
            StreamSqlError::InvalidPosition {
                line: position.line,
                character: position.character,
            },
        )?;
        Ok(self.rope.char_to_byte(char_idx))
    }

    /// Changes recorded since the last take
    pub fn changes(&self) -> &[Change] {
        &self.changes
    }

    pub fn take_changes(&mut self) -> Vec<Change> {
        std::mem::take(&mut self.changes)
    }

    fn char_index(&self, offset: usize) -> Result<usize> {
        let len = self.rope.len_bytes();
        let invalid = || StreamSqlError::InvalidOffset { offset, len };
        if offset > len {
            return Err(invalid().into());
        }
        let char_idx = self.rope.byte_to_char(offset);
        if self.rope.char_to_byte(char_idx) != offset {
            return Err(invalid().into());
        }
        Ok(char_idx)
    }

    fn char_range(&self, range: &Range<usize>) -> Result<Range<usize>> {
        if range.start > range.end {
            return Err(anyhow!("Range {range:?} has start > end"));
        }
        Ok(self.char_index(range.start)?..self.char_index(range.end)?)
    }
}
