//! Declarative Dialect Configuration
//!
//! The dialect is described by two TOML files compiled into the crate:
//! - `config.toml` - comment markers, operators, bracket pairs
//! - `completions.toml` - keywords, data types, stream options, functions and
//!   window functions
//!
//! Both are parsed once into a [`DialectBundle`], which owns the resulting
//! [`SymbolCatalog`].

use crate::dialect::{FunctionCategory, SymbolCatalog, SymbolEntry};
use crate::error::{Result, StreamSqlError};
use serde::{Deserialize, Serialize};

/// Comment styles configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentsConfig {
    /// Single-line comment prefix
    #[serde(default = "default_line_comment")]
    pub line_comment: String,
    /// Block comment start
    #[serde(default = "default_block_comment_start")]
    pub block_comment_start: String,
    /// Block comment end
    #[serde(default = "default_block_comment_end")]
    pub block_comment_end: String,
}

fn default_line_comment() -> String {
    "--".to_string()
}
fn default_block_comment_start() -> String {
    "/*".to_string()
}
fn default_block_comment_end() -> String {
    "*/".to_string()
}

impl Default for CommentsConfig {
    fn default() -> Self {
        Self {
            line_comment: default_line_comment(),
            block_comment_start: default_block_comment_start(),
            block_comment_end: default_block_comment_end(),
        }
    }
}

/// Syntax features configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyntaxConfig {
    /// Catalog lookups always lower-case names, so only `false` is accepted
    #[serde(default)]
    pub case_sensitive: bool,
    /// Operators recognised in runs of symbol characters
    #[serde(default = "default_operators")]
    pub operators: Vec<String>,
    /// Matching bracket pairs, e.g. `["(", ")"]`
    ///
    /// This and `auto_closing_pairs` are editor language configuration for
    /// the host; the tokenizer has its own fixed bracket set.
    #[serde(default = "default_brackets")]
    pub brackets: Vec<[String; 2]>,
    /// Pairs the host closes automatically when the opener is typed
    #[serde(default = "default_auto_closing_pairs")]
    pub auto_closing_pairs: Vec<[String; 2]>,
}

fn default_operators() -> Vec<String> {
    [
        "=", ">", "<", "!", "~", "?", ":", "==", "<=", ">=", "!=", "<>", "&&", "||", "++",
        "+", "-", "*", "/", "&", "|", "^", "%", "<<", ">>", "->", "=>",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<[String; 2]> {
    list.iter()
        .map(|(open, close)| [open.to_string(), close.to_string()])
        .collect()
}

fn default_brackets() -> Vec<[String; 2]> {
    pairs(&[("(", ")"), ("[", "]"), ("{", "}")])
}

fn default_auto_closing_pairs() -> Vec<[String; 2]> {
    pairs(&[("(", ")"), ("[", "]"), ("{", "}"), ("\"", "\""), ("'", "'")])
}

impl Default for SyntaxConfig {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            operators: default_operators(),
            brackets: default_brackets(),
            auto_closing_pairs: default_auto_closing_pairs(),
        }
    }
}

/// Main dialect configuration loaded from config.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DialectConfig {
    /// Dialect identifier
    pub id: String,
    /// Human-readable display name
    pub display_name: String,
    /// Comment styles
    #[serde(default)]
    pub comments: CommentsConfig,
    /// Syntax features
    #[serde(default)]
    pub syntax: SyntaxConfig,
}

impl Default for DialectConfig {
    fn default() -> Self {
        Self {
            id: "streamsql".to_string(),
            display_name: "Stream SQL".to_string(),
            comments: CommentsConfig::default(),
            syntax: SyntaxConfig::default(),
        }
    }
}

// ============================================================================
// Completions Configuration (completions.toml)
// ============================================================================

/// Function or window function definition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionDef {
    /// Function name
    pub name: String,
    /// Function signature (e.g., "avg(col)")
    pub signature: String,
    /// Description shown in hover and completion documentation
    pub description: String,
    /// Worked example
    #[serde(default)]
    pub example: Option<String>,
    /// Category for grouping
    #[serde(default)]
    pub category: FunctionCategory,
}

impl From<&FunctionDef> for SymbolEntry {
    fn from(def: &FunctionDef) -> Self {
        let entry = SymbolEntry {
            name: def.name.clone().into(),
            signature: def.signature.clone().into(),
            description: def.description.clone().into(),
            example: None,
            category: def.category,
        };
        match &def.example {
            Some(example) => entry.with_example(example.clone()),
            None => entry,
        }
    }
}

/// Completions configuration loaded from completions.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompletionsConfig {
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default)]
    pub data_types: Vec<String>,
    #[serde(default)]
    pub stream_options: Vec<String>,
    #[serde(default, rename = "function")]
    pub functions: Vec<FunctionDef>,
    #[serde(default, rename = "window_function")]
    pub window_functions: Vec<FunctionDef>,
}

impl CompletionsConfig {
    /// Build the lookup catalog, preserving declaration order
    pub fn to_catalog(&self) -> SymbolCatalog {
        let mut builder = SymbolCatalog::builder()
            .keywords(self.keywords.iter().cloned())
            .data_types(self.data_types.iter().cloned())
            .stream_options(self.stream_options.iter().cloned());
        for def in &self.functions {
            builder = builder.function(def.into());
        }
        for def in &self.window_functions {
            builder = builder.window_function(def.into());
        }
        builder.build()
    }
}

// ============================================================================
// Full Dialect Bundle
// ============================================================================

/// Complete dialect definition: configuration plus the derived catalog
#[derive(Debug, Clone, Default)]
pub struct DialectBundle {
    /// Main configuration from config.toml
    pub config: DialectConfig,
    /// Raw completion definitions from completions.toml
    pub completions: CompletionsConfig,
    catalog: SymbolCatalog,
}

impl DialectBundle {
    pub fn new(config: DialectConfig, completions: CompletionsConfig) -> Self {
        let catalog = completions.to_catalog();
        Self {
            config,
            completions,
            catalog,
        }
    }

    /// Bundle around a catalog built in code; `completions` stays empty
    pub fn from_catalog(config: DialectConfig, catalog: SymbolCatalog) -> Self {
        Self {
            config,
            completions: CompletionsConfig::default(),
            catalog,
        }
    }

    /// Parse a bundle from the contents of config.toml and completions.toml
    pub fn from_toml(config_toml: &str, completions_toml: &str) -> Result<Self> {
        let config: DialectConfig = toml::from_str(config_toml)?;
        let completions: CompletionsConfig = toml::from_str(completions_toml)?;

        if config.comments.line_comment.is_empty()
            || config.comments.block_comment_start.is_empty()
            || config.comments.block_comment_end.is_empty()
        {
            return Err(StreamSqlError::Configuration(format!(
                "dialect '{}' declares an empty comment marker",
                config.id
            )));
        }

        if config.syntax.case_sensitive {
            return Err(StreamSqlError::Configuration(format!(
                "dialect '{}' sets case_sensitive, but names are matched case-insensitively",
                config.id
            )));
        }

        Ok(Self::new(config, completions))
    }

    pub fn id(&self) -> &str {
        &self.config.id
    }

    pub fn display_name(&self) -> &str {
        &self.config.display_name
    }

    pub fn catalog(&self) -> &SymbolCatalog {
        &self.catalog
    }
}
