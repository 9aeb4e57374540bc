//! StreamSQL Core - Dialect data and tokenizer for the Stream SQL language service
//!
//! This crate holds everything the editor-facing crates share:
//!
//! - `SymbolCatalog` - keywords, data types, stream options, functions and
//!   window functions of the dialect
//! - `DialectBundle` - the dialect as loaded from its TOML files
//! - `Tokenizer` - line-oriented lexer producing classified tokens
//! - `StreamSqlError` - the error type for fallible setup operations

mod dialect;
pub mod dialect_config;
pub mod dialects;
mod error;
pub mod lexer;

pub use dialect::*;
pub use dialect_config::{
    CommentsConfig, CompletionsConfig, DialectBundle, DialectConfig, FunctionDef, SyntaxConfig,
};
pub use dialects::{builtin_bundle, builtin_catalog};
pub use error::*;
pub use lexer::{
    LexState, LineTokens, Lines, Token, TokenClass, Tokenizer, Tokens, is_word_continue,
    is_word_start, word_spans,
};
