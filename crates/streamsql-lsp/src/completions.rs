//! Stream SQL completions
//!
//! Every catalog entry is offered on every request. Ranking and filtering
//! against the typed prefix belong to the host's fuzzy matcher; this module
//! only anchors each item to the prefix so accepting it replaces the prefix.

use lsp_types::{
    CompletionContext, CompletionItem, CompletionItemKind, CompletionResponse,
    CompletionTextEdit, Documentation, InsertTextFormat, Position, Range, TextEdit,
};
use ropey::Rope;
use std::sync::Arc;
use streamsql_core::{SymbolEntry, SymbolKind};

use crate::StreamSqlLsp;
use crate::hover::entry_markdown;
use crate::position::LineCursor;
use crate::provider::CompletionProvider;

fn item_kind(kind: SymbolKind) -> CompletionItemKind {
    match kind {
        SymbolKind::Keyword => CompletionItemKind::KEYWORD,
        SymbolKind::DataType => CompletionItemKind::TYPE_PARAMETER,
        SymbolKind::StreamOption => CompletionItemKind::PROPERTY,
        SymbolKind::Function | SymbolKind::WindowFunction => CompletionItemKind::FUNCTION,
    }
}

/// Sort group, so the host's stable ordering follows catalog order
fn sort_group(kind: SymbolKind) -> usize {
    SymbolKind::PRECEDENCE
        .iter()
        .position(|k| *k == kind)
        .unwrap_or(SymbolKind::PRECEDENCE.len())
}

fn insert_text(kind: SymbolKind, name: &str) -> (String, InsertTextFormat) {
    match kind {
        SymbolKind::StreamOption => (format!("{name} = "), InsertTextFormat::PLAIN_TEXT),
        SymbolKind::Function | SymbolKind::WindowFunction => {
            (format!("{name}($1)"), InsertTextFormat::SNIPPET)
        }
        SymbolKind::Keyword | SymbolKind::DataType => {
            (name.to_string(), InsertTextFormat::PLAIN_TEXT)
        }
    }
}

fn completion_item(
    kind: SymbolKind,
    name: &str,
    entry: Option<&SymbolEntry>,
    range: Range,
    index: usize,
) -> CompletionItem {
    let (new_text, format) = insert_text(kind, name);
    let detail = match entry {
        Some(entry) if kind == SymbolKind::WindowFunction => {
            format!("{} · {}", kind.label(), entry.signature)
        }
        Some(entry) => entry.signature.to_string(),
        None => kind.label().to_string(),
    };

    CompletionItem {
        label: name.to_string(),
        kind: Some(item_kind(kind)),
        detail: Some(detail),
        documentation: entry
            .map(|entry| Documentation::MarkupContent(entry_markdown(kind, entry))),
        sort_text: Some(format!("{}_{index:04}", sort_group(kind))),
        filter_text: Some(name.to_string()),
        insert_text: Some(new_text.clone()),
        insert_text_format: Some(format),
        text_edit: Some(CompletionTextEdit::Edit(TextEdit::new(range, new_text))),
        ..Default::default()
    }
}

impl StreamSqlLsp {
    /// Completion items for the word being typed at `position`
    ///
    /// Returns every keyword, data type, stream option, function and window
    /// function, in that order, each with a text edit spanning exactly the
    /// typed prefix. Positions outside the buffer give an empty list.
    pub fn get_completions(&self, text: &Rope, position: Position) -> Vec<CompletionItem> {
        let Some(cursor) = LineCursor::at(text, position) else {
            tracing::debug!(?position, "Completion position outside buffer");
            return Vec::new();
        };

        let range = cursor.prefix_range();
        tracing::debug!(prefix = %cursor.prefix(), ?range, "Computing completions");

        let catalog = self.catalog();
        let mut completions = Vec::with_capacity(catalog.len());

        for (i, keyword) in catalog.keywords().enumerate() {
            completions.push(completion_item(SymbolKind::Keyword, keyword, None, range, i));
        }
        for (i, data_type) in catalog.data_types().enumerate() {
            completions.push(completion_item(SymbolKind::DataType, data_type, None, range, i));
        }
        for (i, option) in catalog.stream_options().enumerate() {
            completions.push(completion_item(SymbolKind::StreamOption, option, None, range, i));
        }
        for (i, entry) in catalog.functions().enumerate() {
            completions.push(completion_item(
                SymbolKind::Function,
                &entry.name,
                Some(entry),
                range,
                i,
            ));
        }
        for (i, entry) in catalog.window_functions().enumerate() {
            completions.push(completion_item(
                SymbolKind::WindowFunction,
                &entry.name,
                Some(entry),
                range,
                i,
            ));
        }

        tracing::debug!(count = completions.len(), "Returning completions");
        completions
    }
}

/// Whether inserting `new_text` should open the completion menu
///
/// Typing an identifier character triggers; pasted or multi-character input
/// triggers only when it contains something alphanumeric.
pub fn is_completion_trigger(new_text: &str) -> bool {
    let mut chars = new_text.chars();
    match (chars.next(), chars.next()) {
        (None, _) => false,
        (Some(ch), None) => ch.is_alphanumeric() || ch == '_',
        _ => new_text.chars().any(char::is_alphanumeric),
    }
}

pub struct StreamSqlCompletionProvider {
    lsp: Arc<StreamSqlLsp>,
}

impl StreamSqlCompletionProvider {
    pub fn new(lsp: Arc<StreamSqlLsp>) -> Self {
        Self { lsp }
    }
}

impl CompletionProvider for StreamSqlCompletionProvider {
    fn completions(
        &self,
        text: &Rope,
        position: Position,
        _trigger: Option<&CompletionContext>,
    ) -> CompletionResponse {
        tracing::debug!(?position, "Getting Stream SQL completions");
        CompletionResponse::Array(self.lsp.get_completions(text, position))
    }

    fn is_completion_trigger(&self, new_text: &str) -> bool {
        let trigger = is_completion_trigger(new_text);
        tracing::trace!(new_text, trigger, "is_completion_trigger");
        trigger
    }
}
