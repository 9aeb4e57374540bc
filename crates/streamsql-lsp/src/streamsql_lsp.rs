//! Stream SQL language features
//!
//! Provides completions, hover documentation and signature help for the
//! Stream SQL dialect, plus a pass-through bridge for diagnostics computed by
//! the host. Every feature is a synchronous function of `(text, position)`
//! over the immutable dialect catalogs; nothing is cached between requests.

use lsp_types::{CompletionItem, Hover, Position, SignatureHelp};
use ropey::Rope;
use std::sync::Arc;
use streamsql_core::{
    DialectBundle, DialectConfig, SymbolCatalog, Tokenizer, builtin_bundle,
};

mod completions;
mod diagnostics;
mod hover;
pub mod position;
mod provider;
mod signature_help;

#[cfg(test)]
mod tests;

pub use completions::{StreamSqlCompletionProvider, is_completion_trigger};
pub use diagnostics::{
    DiagnosticsBridge, MarkerHost, MarkerListener, MarkerRegistry, MarkerSubscription,
};
pub use hover::StreamSqlHoverProvider;
pub use provider::{CompletionProvider, HoverProvider, SignatureHelpProvider};
pub use signature_help::StreamSqlSignatureHelpProvider;

/// Language service for one dialect
///
/// Immutable once built, so a single instance can be shared by every buffer
/// through an `Arc`.
#[derive(Debug, Clone)]
pub struct StreamSqlLsp {
    bundle: Arc<DialectBundle>,
}

impl StreamSqlLsp {
    pub fn new(bundle: Arc<DialectBundle>) -> Self {
        Self { bundle }
    }

    /// Service over the built-in Stream SQL dialect
    pub fn builtin() -> Self {
        Self::new(Arc::new(builtin_bundle().clone()))
    }

    /// Service over a catalog built in code, with the default comment syntax
    pub fn with_catalog(catalog: SymbolCatalog) -> Self {
        Self::new(Arc::new(DialectBundle::from_catalog(
            DialectConfig::default(),
            catalog,
        )))
    }

    pub fn bundle(&self) -> &Arc<DialectBundle> {
        &self.bundle
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        self.bundle.catalog()
    }

    /// Tokenizer classifying against the same catalog this service documents
    pub fn tokenizer(&self) -> Tokenizer<'_> {
        Tokenizer::from_bundle(&self.bundle)
    }

    /// [`StreamSqlLsp::get_completions`] over a plain string
    pub fn complete(&self, text: &str, position: Position) -> Vec<CompletionItem> {
        self.get_completions(&Rope::from_str(text), position)
    }

    /// [`StreamSqlLsp::get_hover`] over a plain string
    pub fn hover(&self, text: &str, position: Position) -> Option<Hover> {
        self.get_hover(&Rope::from_str(text), position)
    }

    /// [`StreamSqlLsp::get_signature_help`] over a plain string
    pub fn signature_help(&self, text: &str, position: Position) -> Option<SignatureHelp> {
        self.get_signature_help(&Rope::from_str(text), position)
    }
}

impl Default for StreamSqlLsp {
    fn default() -> Self {
        Self::builtin()
    }
}
