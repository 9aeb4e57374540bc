//! One open Stream SQL document
//!
//! The session ties a [`TextBuffer`] to the language service. Highlighting is
//! line-oriented: each line is scanned from the lexer state the previous line
//! ended in, and those entry states are cached. An edit only invalidates the
//! states of lines after the first line it touched.

use anyhow::Result;
use lsp_types::{
    CompletionItem, CompletionResponse, Diagnostic, Hover, Position, SignatureHelp, TextEdit,
};
use std::ops::Range;
use std::sync::Arc;
use streamsql_core::LexState;
use streamsql_lsp::{MarkerHost, MarkerListener, MarkerRegistry, MarkerSubscription, StreamSqlLsp};

use crate::buffer::{Change, TextBuffer};
use crate::lsp::Lsp;
use crate::syntax::{Highlight, SyntaxHighlighter};

#[derive(Debug)]
pub struct EditorSession {
    buffer: TextBuffer,
    lsp: Arc<StreamSqlLsp>,
    providers: Lsp,
    /// Entry state of each line, known for a prefix of the buffer
    line_states: Vec<LexState>,
    markers: Vec<Diagnostic>,
    registry: MarkerRegistry,
}

impl EditorSession {
    /// Session with every Stream SQL provider bound
    pub fn new(text: impl AsRef<str>, lsp: Arc<StreamSqlLsp>) -> Self {
        let providers = Lsp::stream_sql(lsp.clone());
        Self::with_providers(text, lsp, providers)
    }

    /// Session over the built-in dialect
    pub fn builtin(text: impl AsRef<str>) -> Self {
        Self::new(text, Arc::new(StreamSqlLsp::builtin()))
    }

    pub fn with_providers(text: impl AsRef<str>, lsp: Arc<StreamSqlLsp>, providers: Lsp) -> Self {
        Self {
            buffer: TextBuffer::new(text),
            lsp,
            providers,
            line_states: vec![LexState::Root],
            markers: Vec::new(),
            registry: MarkerRegistry::new(),
        }
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// Mutable buffer access for edits the session does not see
    ///
    /// Drops every cached line state.
    pub fn buffer_mut(&mut self) -> &mut TextBuffer {
        self.invalidate_from(0);
        &mut self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn lsp(&self) -> &Arc<StreamSqlLsp> {
        &self.lsp
    }

    pub fn providers(&self) -> &Lsp {
        &self.providers
    }

    pub fn insert(&mut self, offset: usize, text: &str) -> Result<()> {
        self.buffer.insert(offset, text)?;
        self.edited_at(offset);
        Ok(())
    }

    pub fn delete(&mut self, range: Range<usize>) -> Result<()> {
        let start = range.start;
        self.buffer.delete(range)?;
        self.edited_at(start);
        Ok(())
    }

    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<()> {
        let start = range.start;
        self.buffer.replace(range, text)?;
        self.edited_at(start);
        Ok(())
    }

    /// Replace the whole document
    pub fn set_text(&mut self, text: &str) -> Result<()> {
        let len = self.buffer.len();
        self.replace(0..len, text)
    }

    /// Apply an LSP edit, such as an accepted completion
    pub fn apply_text_edit(&mut self, edit: &TextEdit) -> Result<()> {
        let start = self.buffer.position_to_offset(edit.range.start)?;
        let end = self.buffer.position_to_offset(edit.range.end)?;
        self.replace(start..end, &edit.new_text)
    }

    /// Drain the buffer's change log, oldest first
    ///
    /// Cached line states still describe the current text and are kept.
    pub fn take_changes(&mut self) -> Vec<Change> {
        self.buffer.take_changes()
    }

    fn edited_at(&mut self, offset: usize) {
        // Text before `offset` is unchanged, so its line index is too.
        let line = self.buffer.byte_to_line(offset).unwrap_or(0);
        self.invalidate_from(line);
    }

    /// Forget entry states after `line`; its own entry state depends only on
    /// the lines above it
    fn invalidate_from(&mut self, line: usize) {
        let keep = line + 1;
        if self.line_states.len() > keep {
            tracing::trace!(
                line,
                dropped = self.line_states.len() - keep,
                "Invalidating line states"
            );
            self.line_states.truncate(keep);
        }
    }

    /// Lexer state `line` starts in, scanning forward from the last cached line
    pub fn entry_state(&mut self, line: usize) -> Option<LexState> {
        if line >= self.buffer.line_count() {
            return None;
        }

        let tokenizer = self.lsp.tokenizer();
        while self.line_states.len() <= line {
            let idx = self.line_states.len() - 1;
            let content = self.buffer.line(idx)?;
            let state = tokenizer.tokenize_line(&content, self.line_states[idx]).end_state;
            self.line_states.push(state);
        }
        Some(self.line_states[line])
    }

    /// Highlights for one line, with buffer-absolute byte offsets
    pub fn line_highlights(&mut self, line: usize) -> Option<Vec<Highlight>> {
        let entry = self.entry_state(line)?;
        let content = self.buffer.line(line)?;
        let line_start = self.buffer.line_to_byte(line)?;

        let highlighter = SyntaxHighlighter::new(self.lsp.tokenizer());
        let (mut highlights, end_state) = highlighter.highlight_line(&content, entry);
        if self.line_states.len() == line + 1 && line + 1 < self.buffer.line_count() {
            self.line_states.push(end_state);
        }

        for highlight in &mut highlights {
            highlight.start += line_start;
            highlight.end += line_start;
        }
        Some(highlights)
    }

    /// Highlights for the whole document
    pub fn highlights(&mut self) -> Vec<Highlight> {
        (0..self.buffer.line_count())
            .filter_map(|line| self.line_highlights(line))
            .flatten()
            .collect()
    }

    pub fn completions(&self, position: Position) -> Vec<CompletionItem> {
        let Some(provider) = &self.providers.completion_provider else {
            return Vec::new();
        };
        match provider.completions(self.buffer.rope(), position, None) {
            CompletionResponse::Array(items) => items,
            CompletionResponse::List(list) => list.items,
        }
    }

    /// Whether typing `new_text` should open the completion menu
    pub fn is_completion_trigger(&self, new_text: &str) -> bool {
        self.providers
            .completion_provider
            .as_ref()
            .is_some_and(|provider| provider.is_completion_trigger(new_text))
    }

    pub fn hover(&self, position: Position) -> Option<Hover> {
        self.providers
            .hover_provider
            .as_ref()?
            .hover(self.buffer.rope(), position)
    }

    pub fn signature_help(&self, position: Position) -> Option<SignatureHelp> {
        self.providers
            .signature_help_provider
            .as_ref()?
            .signature_help(self.buffer.rope(), position)
    }

    /// Replace the document's markers and notify subscribers
    pub fn publish_markers(&mut self, markers: Vec<Diagnostic>) {
        self.markers = markers;
        self.registry.publish(&self.markers);
    }

    pub fn markers(&self) -> &[Diagnostic] {
        &self.markers
    }
}

impl MarkerHost for EditorSession {
    fn subscribe_markers(&self, listener: MarkerListener) -> MarkerSubscription {
        self.registry.subscribe_markers(listener)
    }
}
