//! Error types for StreamSQL

use thiserror::Error;

/// Core error type for StreamSQL language-service operations
#[derive(Error, Debug)]
pub enum StreamSqlError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid position: line {line}, character {character}")]
    InvalidPosition { line: u32, character: u32 },

    #[error("Invalid offset: {offset} (buffer length: {len})")]
    InvalidOffset { offset: usize, len: usize },

    #[error("Dialect parse error: {0}")]
    DialectParse(#[from] toml::de::Error),
}

/// Result type alias for StreamSQL operations
pub type Result<T> = std::result::Result<T, StreamSqlError>;
