//! Tests for completion items and their content

use super::test_helpers::*;
use lsp_types::{CompletionItemKind, Documentation, InsertTextFormat};
use pretty_assertions::assert_eq;
use streamsql_core::SymbolCatalog;

use crate::StreamSqlLsp;

#[test]
fn test_every_catalog_entry_is_offered() {
    let lsp = create_test_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));
    assert_eq!(items.len(), lsp.catalog().len());
}

#[test]
fn test_items_are_not_filtered_by_prefix() {
    let lsp = create_test_lsp();
    let items = lsp.get_completions(&rope("SELECT zz"), pos(0, 9));
    assert_eq!(items.len(), lsp.catalog().len());
    assert!(items.iter().any(|item| item.label == "SELECT"));
}

#[test]
fn test_item_order_follows_catalog() {
    let lsp = create_small_lsp();
    let labels: Vec<_> = lsp
        .get_completions(&rope(""), pos(0, 0))
        .into_iter()
        .map(|item| item.label)
        .collect();
    assert_eq!(
        labels,
        vec!["SELECT", "BIGINT", "DATASOURCE", "avg", "TUMBLINGWINDOW"]
    );
}

#[test]
fn test_sort_text_preserves_order() {
    let lsp = create_test_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));
    let sort_texts: Vec<_> = items
        .iter()
        .map(|item| item.sort_text.clone().unwrap())
        .collect();
    let mut sorted = sort_texts.clone();
    sorted.sort();
    assert_eq!(sort_texts, sorted);
}

#[test]
fn test_keyword_and_type_items_insert_name() {
    let lsp = create_small_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));

    let select = find_item(&items, "SELECT");
    assert_eq!(select.kind, Some(CompletionItemKind::KEYWORD));
    assert_eq!(select.insert_text.as_deref(), Some("SELECT"));
    assert_eq!(text_edit(select).new_text, "SELECT");

    let bigint = find_item(&items, "BIGINT");
    assert_eq!(bigint.kind, Some(CompletionItemKind::TYPE_PARAMETER));
    assert_eq!(bigint.insert_text.as_deref(), Some("BIGINT"));
    assert!(bigint.documentation.is_none());
}

#[test]
fn test_stream_option_inserts_assignment() {
    let lsp = create_small_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));
    let option = find_item(&items, "DATASOURCE");
    assert_eq!(option.kind, Some(CompletionItemKind::PROPERTY));
    assert_eq!(option.insert_text.as_deref(), Some("DATASOURCE = "));
    assert_eq!(text_edit(option).new_text, "DATASOURCE = ");
}

#[test]
fn test_function_inserts_snippet() {
    let lsp = create_small_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));
    let avg = find_item(&items, "avg");
    assert_eq!(avg.kind, Some(CompletionItemKind::FUNCTION));
    assert_eq!(avg.insert_text.as_deref(), Some("avg($1)"));
    assert_eq!(avg.insert_text_format, Some(InsertTextFormat::SNIPPET));
    assert_eq!(avg.detail.as_deref(), Some("avg(col)"));

    let Some(Documentation::MarkupContent(doc)) = &avg.documentation else {
        panic!("function completion should carry markdown documentation");
    };
    assert!(doc.value.contains("avg(col)"));
    assert!(doc.value.contains("Returns the average"));
    assert!(!doc.value.contains("**Example:**"));
}

#[test]
fn test_window_function_documentation_has_example() {
    let lsp = create_small_lsp();
    let items = lsp.get_completions(&rope(""), pos(0, 0));
    let window = find_item(&items, "TUMBLINGWINDOW");
    assert_eq!(window.kind, Some(CompletionItemKind::FUNCTION));
    assert_eq!(window.insert_text.as_deref(), Some("TUMBLINGWINDOW($1)"));
    assert!(window.detail.as_deref().unwrap().starts_with("Window Function"));

    let Some(Documentation::MarkupContent(doc)) = &window.documentation else {
        panic!("window function completion should carry markdown documentation");
    };
    assert!(doc.value.contains("**Example:**"));
    assert!(doc.value.contains("GROUP BY TUMBLINGWINDOW(ss, 10)"));
}

#[test]
fn test_empty_catalog_yields_nothing() {
    let lsp = StreamSqlLsp::with_catalog(SymbolCatalog::default());
    assert!(lsp.get_completions(&rope("SEL"), pos(0, 3)).is_empty());
}

#[test]
fn test_out_of_range_position_yields_nothing() {
    let lsp = create_test_lsp();
    let text = rope("SELECT");
    assert!(lsp.get_completions(&text, pos(0, 7)).is_empty());
    assert!(lsp.get_completions(&text, pos(3, 0)).is_empty());
}

#[test]
fn test_completion_on_trailing_empty_line() {
    let lsp = create_test_lsp();
    let items = lsp.get_completions(&rope("SELECT *\n"), pos(1, 0));
    assert!(!items.is_empty());
}

#[test]
fn test_complete_accepts_plain_text() {
    let lsp = create_small_lsp();
    let items = lsp.complete("SELECT a", pos(0, 8));
    assert_eq!(items.len(), 5);
}
