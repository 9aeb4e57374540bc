//! Stream SQL syntax highlighting.
//!
//! Highlighting is a direct lookup over the tokenizer's classes: every
//! [`TokenClass`] has its own [`HighlightKind`], and a [`Theme`] maps each
//! kind to a display style. Functions and window functions stay separate
//! kinds so a theme can render them differently.
//!
//! ## Usage
//!
//! ```rust
//! use streamsql_text_editor::syntax::{HighlightKind, SyntaxHighlighter, Theme};
//!
//! let highlighter = SyntaxHighlighter::builtin();
//! let text = "SELECT avg(temp) FROM demo GROUP BY TUMBLINGWINDOW(ss, 10)";
//! let theme = Theme::default();
//! for h in highlighter.highlight(text) {
//!     let style = theme.style(h.kind);
//!     println!("{:?} {:?}: {}", h.kind, style.color, &text[h.start..h.end]);
//! }
//! ```

use anyhow::{Context as _, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use streamsql_core::{LexState, TokenClass, Tokenizer};

/// Stream SQL highlight categories, one per token class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum HighlightKind {
    /// Line and block comments
    Comment,
    /// Quoted literals
    String,
    /// Escape sequences and line continuations inside literals
    StringEscape,
    /// Unrecognised escape codes
    StringEscapeInvalid,
    /// Literals left open at the end of a line
    StringInvalid,
    /// Integer literals
    Number,
    /// Float literals
    NumberFloat,
    /// Dialect keywords (SELECT, CREATE, WHERE, etc.)
    Keyword,
    /// Column data types
    Type,
    /// Stream declaration options (DATASOURCE, FORMAT, etc.)
    StreamOption,
    /// Scalar and aggregate functions
    Function,
    /// Window functions (TUMBLINGWINDOW, etc.)
    WindowFunction,
    /// Stream, table and column names
    Identifier,
    Operator,
    Bracket,
    /// `;` `,` `.`
    Delimiter,
    Whitespace,
    /// Unstyled text
    #[default]
    Default,
}

impl HighlightKind {
    pub const ALL: [HighlightKind; 18] = [
        HighlightKind::Comment,
        HighlightKind::String,
        HighlightKind::StringEscape,
        HighlightKind::StringEscapeInvalid,
        HighlightKind::StringInvalid,
        HighlightKind::Number,
        HighlightKind::NumberFloat,
        HighlightKind::Keyword,
        HighlightKind::Type,
        HighlightKind::StreamOption,
        HighlightKind::Function,
        HighlightKind::WindowFunction,
        HighlightKind::Identifier,
        HighlightKind::Operator,
        HighlightKind::Bracket,
        HighlightKind::Delimiter,
        HighlightKind::Whitespace,
        HighlightKind::Default,
    ];

    /// Name used for this kind in theme files
    pub fn name(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::StringEscape => "string_escape",
            Self::StringEscapeInvalid => "string_escape_invalid",
            Self::StringInvalid => "string_invalid",
            Self::Number => "number",
            Self::NumberFloat => "number_float",
            Self::Keyword => "keyword",
            Self::Type => "type",
            Self::StreamOption => "stream_option",
            Self::Function => "function",
            Self::WindowFunction => "window_function",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Bracket => "bracket",
            Self::Delimiter => "delimiter",
            Self::Whitespace => "whitespace",
            Self::Default => "default",
        }
    }

    /// Kinds rendered with an error underline
    pub fn is_error(&self) -> bool {
        matches!(self, Self::StringInvalid | Self::StringEscapeInvalid)
    }
}

impl FromStr for HighlightKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| anyhow!("unknown highlight kind '{s}'"))
    }
}

impl From<TokenClass> for HighlightKind {
    fn from(class: TokenClass) -> Self {
        match class {
            TokenClass::Comment => Self::Comment,
            TokenClass::String => Self::String,
            TokenClass::StringEscape => Self::StringEscape,
            TokenClass::StringEscapeInvalid => Self::StringEscapeInvalid,
            TokenClass::StringInvalid => Self::StringInvalid,
            TokenClass::NumberInt => Self::Number,
            TokenClass::NumberFloat => Self::NumberFloat,
            TokenClass::Keyword => Self::Keyword,
            TokenClass::Type => Self::Type,
            TokenClass::StreamOption => Self::StreamOption,
            TokenClass::Function => Self::Function,
            TokenClass::WindowFunction => Self::WindowFunction,
            TokenClass::Identifier => Self::Identifier,
            TokenClass::Operator => Self::Operator,
            TokenClass::Bracket => Self::Bracket,
            TokenClass::Delimiter => Self::Delimiter,
            TokenClass::Whitespace => Self::Whitespace,
            TokenClass::Default => Self::Default,
        }
    }
}

/// A highlight range representing a styled segment of text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// The start byte offset
    pub start: usize,
    /// The end byte offset
    pub end: usize,
    /// The kind of highlight
    pub kind: HighlightKind,
}

/// 24-bit RGB color, written `#rrggbb` in theme files
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

impl Color {
    pub const fn rgb(hex: u32) -> Self {
        Self(hex & 0x00ff_ffff)
    }

    pub fn hex(&self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl FromStr for Color {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let digits = s
            .strip_prefix('#')
            .ok_or_else(|| anyhow!("color '{s}' must start with '#'"))?;
        if digits.len() != 6 {
            return Err(anyhow!("color '{s}' must have six hex digits"));
        }
        let value = u32::from_str_radix(digits, 16)
            .with_context(|| format!("color '{s}' is not hexadecimal"))?;
        Ok(Self(value))
    }
}

impl TryFrom<String> for Color {
    type Error = anyhow::Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        format!("{color:?}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

/// Display style for one highlight kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightStyle {
    /// `None` keeps the editor's foreground color
    pub color: Option<Color>,
    pub font_weight: FontWeight,
    pub italic: bool,
    pub underline: bool,
}

impl HighlightStyle {
    const fn color(hex: u32) -> Self {
        Self {
            color: Some(Color::rgb(hex)),
            font_weight: FontWeight::Normal,
            italic: false,
            underline: false,
        }
    }

    const fn bold(mut self) -> Self {
        self.font_weight = FontWeight::Bold;
        self
    }

    const fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    const fn underline(mut self) -> Self {
        self.underline = true;
        self
    }
}

#[derive(Debug, Deserialize)]
struct ThemeFile {
    name: Option<String>,
    #[serde(default)]
    styles: HashMap<String, HighlightStyle>,
}

/// Styles for every highlight kind
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    styles: HashMap<HighlightKind, HighlightStyle>,
}

impl Theme {
    pub fn default_light() -> Self {
        use HighlightKind as K;
        let styles = [
            (K::Comment, HighlightStyle::color(0x008000).italic()),
            (K::String, HighlightStyle::color(0xa31515)),
            (K::StringEscape, HighlightStyle::color(0xee0000)),
            (K::StringEscapeInvalid, HighlightStyle::color(0xcd3131).underline()),
            (K::StringInvalid, HighlightStyle::color(0xcd3131).underline()),
            (K::Number, HighlightStyle::color(0x098658)),
            (K::NumberFloat, HighlightStyle::color(0x098658)),
            (K::Keyword, HighlightStyle::color(0x0000ff).bold()),
            (K::Type, HighlightStyle::color(0x267f99)),
            (K::StreamOption, HighlightStyle::color(0xaf00db)),
            (K::Function, HighlightStyle::color(0x795e26)),
            (K::WindowFunction, HighlightStyle::color(0xc27c0e).bold()),
            (K::Identifier, HighlightStyle::color(0x001080)),
            (K::Operator, HighlightStyle::color(0x000000)),
            (K::Bracket, HighlightStyle::color(0x0431fa)),
            (K::Delimiter, HighlightStyle::color(0x000000)),
            (K::Whitespace, HighlightStyle::default()),
            (K::Default, HighlightStyle::default()),
        ];

        Self {
            name: "Stream SQL Light".to_string(),
            styles: styles.into_iter().collect(),
        }
    }

    /// Parse a theme file, starting from the default theme
    ///
    /// ```toml
    /// name = "Muted"
    ///
    /// [styles.keyword]
    /// color = "#5f5faf"
    /// font_weight = "bold"
    /// ```
    ///
    /// Kinds the file does not mention keep their default style.
    pub fn from_toml(source: &str) -> Result<Self> {
        let file: ThemeFile = toml::from_str(source).context("Failed to parse theme")?;

        let mut theme = Self::default_light();
        if let Some(name) = file.name {
            theme.name = name;
        }
        for (key, style) in file.styles {
            let kind: HighlightKind = key.parse()?;
            theme.styles.insert(kind, style);
        }

        tracing::debug!(theme = %theme.name, "Loaded highlight theme");
        Ok(theme)
    }

    pub fn style(&self, kind: HighlightKind) -> HighlightStyle {
        self.styles.get(&kind).copied().unwrap_or_default()
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_light()
    }
}

/// Stream SQL syntax highlighter
///
/// Holds a tokenizer bound to a dialect catalog; highlighting is stateless,
/// so one highlighter can serve any number of buffers.
#[derive(Debug, Clone)]
pub struct SyntaxHighlighter<'c> {
    tokenizer: Tokenizer<'c>,
}

impl SyntaxHighlighter<'static> {
    /// Highlighter for the built-in dialect
    pub fn builtin() -> Self {
        Self::new(Tokenizer::builtin().clone())
    }
}

impl<'c> SyntaxHighlighter<'c> {
    pub fn new(tokenizer: Tokenizer<'c>) -> Self {
        Self { tokenizer }
    }

    /// Highlights the given text.
    ///
    /// Returns non-overlapping ranges in order of their start offset.
    /// Whitespace carries no style and is omitted.
    pub fn highlight(&self, text: &str) -> Vec<Highlight> {
        self.tokenizer
            .tokenize(text)
            .filter(|token| token.class != TokenClass::Whitespace)
            .map(|token| Highlight {
                start: token.start,
                end: token.end,
                kind: token.class.into(),
            })
            .collect()
    }

    /// Highlights one line scanned from `state`.
    ///
    /// Offsets are relative to the line. Returns the state the next line
    /// starts in alongside the highlights.
    pub fn highlight_line(&self, line: &str, state: LexState) -> (Vec<Highlight>, LexState) {
        let scanned = self.tokenizer.tokenize_line(line, state);
        let highlights = scanned
            .tokens
            .iter()
            .filter(|token| token.class != TokenClass::Whitespace)
            .map(|token| Highlight {
                start: token.start,
                end: token.end,
                kind: token.class.into(),
            })
            .collect();
        (highlights, scanned.end_state)
    }

    /// Get the highlight kind at a byte offset.
    ///
    /// Returns `HighlightKind::Whitespace` between tokens and
    /// `HighlightKind::Default` past the end of the text.
    pub fn highlight_at(&self, text: &str, offset: usize) -> HighlightKind {
        self.tokenizer
            .tokenize(text)
            .find(|token| token.contains(offset))
            .map(|token| token.class.into())
            .unwrap_or_default()
    }

    /// Get all error highlights from the text.
    ///
    /// Used to draw squiggles under unterminated literals and bad escapes.
    pub fn get_errors(&self, text: &str) -> Vec<Highlight> {
        self.highlight(text)
            .into_iter()
            .filter(|h| h.kind.is_error())
            .collect()
    }
}

impl Default for SyntaxHighlighter<'static> {
    fn default() -> Self {
        Self::builtin()
    }
}
