//! Hover documentation for functions and window functions

use lsp_types::{Hover, HoverContents, MarkupContent, MarkupKind, Position};
use ropey::Rope;
use std::sync::Arc;
use streamsql_core::{SymbolEntry, SymbolKind};

use crate::StreamSqlLsp;
use crate::position::LineCursor;
use crate::provider::HoverProvider;

/// Markdown for a documented catalog entry
///
/// Shared by hover and completion documentation so both render identically.
pub(crate) fn entry_markdown(kind: SymbolKind, entry: &SymbolEntry) -> MarkupContent {
    let mut value = format!(
        "```sql\n{}\n```\n\n{}",
        entry.signature, entry.description
    );
    if kind == SymbolKind::WindowFunction
        && let Some(example) = &entry.example
    {
        value.push_str(&format!("\n\n**Example:**\n```sql\n{example}\n```"));
    }
    MarkupContent {
        kind: MarkupKind::Markdown,
        value,
    }
}

impl StreamSqlLsp {
    /// Documentation for the word containing `position`
    ///
    /// Functions are searched before window functions. Positions outside the
    /// buffer, positions between words and undocumented words give `None`.
    pub fn get_hover(&self, text: &Rope, position: Position) -> Option<Hover> {
        let Some(cursor) = LineCursor::at(text, position) else {
            tracing::debug!(?position, "Hover position outside buffer");
            return None;
        };

        let (word, range) = cursor.word_at()?;
        let Some((kind, entry)) = self.catalog().documented(&word) else {
            tracing::trace!(word = %word, "No documentation for word");
            return None;
        };

        tracing::debug!(word = %word, kind = kind.label(), "Hover resolved");
        Some(Hover {
            contents: HoverContents::Markup(entry_markdown(kind, entry)),
            range: Some(range),
        })
    }
}

pub struct StreamSqlHoverProvider {
    lsp: Arc<StreamSqlLsp>,
}

impl StreamSqlHoverProvider {
    pub fn new(lsp: Arc<StreamSqlLsp>) -> Self {
        Self { lsp }
    }
}

impl HoverProvider for StreamSqlHoverProvider {
    fn hover(&self, text: &Rope, position: Position) -> Option<Hover> {
        tracing::debug!(?position, "Stream SQL hover request");
        self.lsp.get_hover(text, position)
    }
}
