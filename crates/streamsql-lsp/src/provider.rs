//! Provider traits the host editor drives
//!
//! A host binds language features through these traits instead of calling
//! [`StreamSqlLsp`](crate::StreamSqlLsp) directly, so any editor widget can be
//! wired up by a thin adapter. All calls are synchronous and complete before
//! returning.

use lsp_types::{CompletionContext, CompletionResponse, Hover, Position, SignatureHelp};
use ropey::Rope;

/// Trait for providing code completions
pub trait CompletionProvider: Send + Sync {
    /// Completions for the given position
    ///
    /// # Arguments
    /// * `text` - The current buffer content
    /// * `position` - Zero-based line and character of the cursor
    /// * `trigger` - How the request was triggered, when the host knows
    fn completions(
        &self,
        text: &Rope,
        position: Position,
        trigger: Option<&CompletionContext>,
    ) -> CompletionResponse;

    /// Check if completion should be triggered for the given text insertion
    fn is_completion_trigger(&self, new_text: &str) -> bool;
}

/// Trait for providing hover information
pub trait HoverProvider: Send + Sync {
    /// Hover information for the given position, or `None` if nothing to show
    fn hover(&self, text: &Rope, position: Position) -> Option<Hover>;
}

/// Trait for providing signature help inside call argument lists
pub trait SignatureHelpProvider: Send + Sync {
    fn signature_help(&self, text: &Rope, position: Position) -> Option<SignatureHelp>;

    /// Characters that should re-request signature help when typed
    fn trigger_characters(&self) -> &[&str] {
        &[]
    }
}
