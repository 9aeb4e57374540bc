//! Stream SQL editor integration
//!
//! Everything an editor widget needs to host a Stream SQL document without
//! depending on a particular UI toolkit.
//!
//! ## Architecture
//!
//! - **TextBuffer**: rope-based text storage using the `ropey` crate
//! - **Syntax Highlighting**: token classes mapped to themeable highlight kinds
//! - **Lsp**: the completion, hover and signature help providers in use
//! - **EditorSession**: one open document, with incremental per-line
//!   highlighting and marker forwarding

pub mod buffer;
pub mod lsp;
pub mod session;
pub mod syntax;

pub use buffer::{Change, TextBuffer};
pub use lsp::Lsp;
pub use session::EditorSession;
pub use syntax::{
    Color, FontWeight, Highlight, HighlightKind, HighlightStyle, SyntaxHighlighter, Theme,
};
