//! Language provider binding for the editor
//!
//! The editor never calls the language service directly; it goes through
//! whichever providers are registered here, so a host can swap or omit any
//! feature.

use std::fmt;
use std::sync::Arc;
use streamsql_lsp::{
    CompletionProvider, HoverProvider, SignatureHelpProvider, StreamSqlCompletionProvider,
    StreamSqlHoverProvider, StreamSqlLsp, StreamSqlSignatureHelpProvider,
};

/// Container for all language providers
///
/// Only the providers that are set are used.
#[derive(Clone, Default)]
pub struct Lsp {
    pub completion_provider: Option<Arc<dyn CompletionProvider>>,
    pub hover_provider: Option<Arc<dyn HoverProvider>>,
    pub signature_help_provider: Option<Arc<dyn SignatureHelpProvider>>,
}

impl Lsp {
    /// Create a new empty container with no providers
    pub fn new() -> Self {
        Self::default()
    }

    /// Every Stream SQL provider, sharing one language service
    pub fn stream_sql(lsp: Arc<StreamSqlLsp>) -> Self {
        Self {
            completion_provider: Some(Arc::new(StreamSqlCompletionProvider::new(lsp.clone()))),
            hover_provider: Some(Arc::new(StreamSqlHoverProvider::new(lsp.clone()))),
            signature_help_provider: Some(Arc::new(StreamSqlSignatureHelpProvider::new(lsp))),
        }
    }

    pub fn has_completions(&self) -> bool {
        self.completion_provider.is_some()
    }

    pub fn has_hover(&self) -> bool {
        self.hover_provider.is_some()
    }

    pub fn has_signature_help(&self) -> bool {
        self.signature_help_provider.is_some()
    }
}

impl fmt::Debug for Lsp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lsp")
            .field("completions", &self.has_completions())
            .field("hover", &self.has_hover())
            .field("signature_help", &self.has_signature_help())
            .finish()
    }
}
