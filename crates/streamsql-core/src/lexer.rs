//! Line-oriented tokenizer for Stream SQL
//!
//! The tokenizer is a finite-state scanner. Each line is scanned starting from
//! the [`LexState`] the previous line ended in, which is the only context that
//! crosses a line boundary:
//! - `BlockComment` while a `/* ... */` comment is open
//! - `DoubleQuotedString` / `SingleQuotedString` after a backslash line
//!   continuation inside a quoted literal
//!
//! Within `Root`, rules are tried in this order at every position:
//! 1. line comment to end of line
//! 2. block comment opener
//! 3. whitespace run
//! 4. quoted literal with no closing quote on the line (`StringInvalid`)
//! 5. quoted literal (enters the string state)
//! 6. float, then integer
//! 7. identifier, classified against the symbol catalog
//! 8. symbol run, matched against the operator set
//! 9. bracket or delimiter
//!
//! Anything else becomes a one-character `Default` token, so every rule
//! consumes at least one character and scanning always terminates.
//!
//! Offsets are UTF-8 byte offsets and token spans tile the input exactly,
//! line terminators included.

use crate::dialect::{SymbolCatalog, SymbolKind};
use crate::dialect_config::{CommentsConfig, DialectBundle, DialectConfig};
use crate::dialects::builtin_bundle;
use std::collections::HashSet;
use std::iter::FusedIterator;
use std::ops::Range;
use std::sync::OnceLock;

/// Scanner state carried from the end of one line into the next
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LexState {
    #[default]
    Root,
    BlockComment,
    DoubleQuotedString,
    SingleQuotedString,
}

impl LexState {
    fn for_quote(quote: char) -> Self {
        if quote == '"' {
            Self::DoubleQuotedString
        } else {
            Self::SingleQuotedString
        }
    }
}

/// Lexical class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Comment,
    String,
    /// Recognised escape sequence inside a literal, or a line continuation
    StringEscape,
    /// Backslash followed by an unrecognised escape code
    StringEscapeInvalid,
    /// Quoted literal with no closing quote on its line
    StringInvalid,
    NumberInt,
    NumberFloat,
    Keyword,
    Type,
    StreamOption,
    Function,
    WindowFunction,
    Identifier,
    Operator,
    Bracket,
    Delimiter,
    Whitespace,
    /// Symbol runs that are not operators and characters no rule matches
    Default,
}

impl TokenClass {
    /// Dotted scope name in the style of editor token themes
    pub fn scope(&self) -> &'static str {
        match self {
            Self::Comment => "comment",
            Self::String => "string",
            Self::StringEscape => "string.escape",
            Self::StringEscapeInvalid => "string.escape.invalid",
            Self::StringInvalid => "string.invalid",
            Self::NumberInt => "number",
            Self::NumberFloat => "number.float",
            Self::Keyword => "keyword",
            Self::Type => "type",
            Self::StreamOption => "stream.option",
            Self::Function => "function",
            Self::WindowFunction => "function.window",
            Self::Identifier => "identifier",
            Self::Operator => "operator",
            Self::Bracket => "delimiter.bracket",
            Self::Delimiter => "delimiter",
            Self::Whitespace => "white",
            Self::Default => "",
        }
    }

    pub fn is_trivia(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Comment)
    }
}

impl From<SymbolKind> for TokenClass {
    fn from(kind: SymbolKind) -> Self {
        match kind {
            SymbolKind::Keyword => Self::Keyword,
            SymbolKind::DataType => Self::Type,
            SymbolKind::StreamOption => Self::StreamOption,
            SymbolKind::Function => Self::Function,
            SymbolKind::WindowFunction => Self::WindowFunction,
        }
    }
}

/// A classified slice of the input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub class: TokenClass,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
}

impl Token<'_> {
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }
}

/// Tokens of one line plus the state the next line starts in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineTokens<'a> {
    pub tokens: Vec<Token<'a>>,
    pub end_state: LexState,
}

const SYMBOL_CHARS: &[u8] = b"=><!~?:&|+-*/^%";

fn is_symbol(b: u8) -> bool {
    SYMBOL_CHARS.contains(&b)
}

fn digits(bytes: &[u8], from: usize) -> usize {
    bytes
        .get(from..)
        .map_or(0, |s| s.iter().take_while(|b| b.is_ascii_digit()).count())
}

fn hex_run(s: &str, max: usize) -> usize {
    s.bytes().take(max).take_while(u8::is_ascii_hexdigit).count()
}

/// `\d*\.\d+([eE][-+]?\d+)?`
fn match_float(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    let int = digits(bytes, 0);
    if bytes.get(int) != Some(&b'.') {
        return None;
    }
    let frac = digits(bytes, int + 1);
    if frac == 0 {
        return None;
    }

    let mut end = int + 1 + frac;
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp = end + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let n = digits(bytes, exp);
        if n > 0 {
            end = exp + n;
        }
    }
    Some(end)
}

/// Integer or float literal at the start of `rest`
fn match_number(rest: &str) -> Option<(usize, TokenClass)> {
    if let Some(len) = match_float(rest) {
        return Some((len, TokenClass::NumberFloat));
    }
    let len = digits(rest.as_bytes(), 0);
    (len > 0).then_some((len, TokenClass::NumberInt))
}

/// First character of an identifier-shaped word
pub fn is_word_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

/// Any later character of an identifier-shaped word
pub fn is_word_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Length of the word starting `rest`, which must begin with a word start
fn word_len(rest: &str) -> usize {
    1 + rest
        .bytes()
        .skip(1)
        .take_while(|b| is_word_continue(char::from(*b)))
        .count()
}

/// Byte ranges of the identifier-shaped words in `line`
///
/// Words are split exactly as the tokenizer splits them in `Root`: a number
/// literal ends before an adjoining letter (`2avg` holds the word `avg`) and
/// any non-ASCII character ends a word. Comments and literals are not
/// skipped.
pub fn word_spans(line: &str) -> impl Iterator<Item = Range<usize>> + '_ {
    let mut pos = 0;
    std::iter::from_fn(move || {
        while let Some(ch) = line[pos..].chars().next() {
            let rest = &line[pos..];
            if is_word_start(ch) {
                let start = pos;
                pos += word_len(rest);
                return Some(start..pos);
            }
            pos += match_number(rest).map_or(ch.len_utf8(), |(len, _)| len);
        }
        None
    })
}

/// Length of a recognised escape code following a backslash
fn escape_len(after: &str) -> Option<usize> {
    match after.chars().next()? {
        'a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\' | '"' | '\'' => Some(1),
        'x' => {
            let n = hex_run(&after[1..], 4);
            (n >= 1).then_some(1 + n)
        }
        'u' => (hex_run(&after[1..], 4) == 4).then_some(5),
        'U' => (hex_run(&after[1..], 8) == 8).then_some(9),
        _ => None,
    }
}

/// How a quoted literal body ends on the current line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LiteralEnd {
    Closed,
    /// Backslash as the last character: the literal continues on the next line
    Continued,
    Unterminated,
}

fn scan_literal(body: &str, quote: char) -> LiteralEnd {
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            if chars.next().is_none() {
                return LiteralEnd::Continued;
            }
        } else if ch == quote {
            return LiteralEnd::Closed;
        }
    }
    LiteralEnd::Unterminated
}

struct LineScanner<'t> {
    line: &'t str,
    pos: usize,
    state: LexState,
    tokens: Vec<Token<'t>>,
}

impl<'t> LineScanner<'t> {
    fn rest(&self) -> &'t str {
        &self.line[self.pos..]
    }

    fn push(&mut self, len: usize, class: TokenClass) {
        debug_assert!(len > 0, "every rule must consume input");
        let start = self.pos;
        let end = start + len;
        self.tokens.push(Token {
            text: &self.line[start..end],
            class,
            start,
            end,
        });
        self.pos = end;
    }
}

/// Stream SQL tokenizer bound to a symbol catalog and comment syntax
#[derive(Debug, Clone)]
pub struct Tokenizer<'c> {
    catalog: &'c SymbolCatalog,
    comments: &'c CommentsConfig,
    operators: HashSet<&'c str>,
}

impl<'c> Tokenizer<'c> {
    pub fn new(catalog: &'c SymbolCatalog, config: &'c DialectConfig) -> Self {
        Self {
            catalog,
            comments: &config.comments,
            operators: config.syntax.operators.iter().map(String::as_str).collect(),
        }
    }

    pub fn from_bundle(bundle: &'c DialectBundle) -> Self {
        Self::new(bundle.catalog(), &bundle.config)
    }

    pub fn catalog(&self) -> &'c SymbolCatalog {
        self.catalog
    }

    /// Class an identifier-shaped word receives
    pub fn classify_word(&self, word: &str) -> TokenClass {
        self.catalog
            .classify(word)
            .map(TokenClass::from)
            .unwrap_or(TokenClass::Identifier)
    }

    /// Tokenize the whole buffer lazily, one line at a time, starting in `Root`
    pub fn tokenize<'a>(&'a self, text: &'a str) -> Tokens<'a> {
        Tokens {
            lines: self.lines(text),
            current: Vec::new().into_iter(),
        }
    }

    /// Per-line view of [`Tokenizer::tokenize`] with buffer-absolute offsets
    pub fn lines<'a>(&'a self, text: &'a str) -> Lines<'a> {
        Lines {
            tokenizer: self,
            text,
            offset: 0,
            state: LexState::Root,
        }
    }

    /// Tokenize a single line (without its terminator) from a carried state
    ///
    /// Offsets are relative to the start of `line`.
    pub fn tokenize_line<'t>(&self, line: &'t str, state: LexState) -> LineTokens<'t> {
        let mut scanner = LineScanner {
            line,
            pos: 0,
            state,
            tokens: Vec::new(),
        };

        // A continued literal that neither closes nor continues again on this
        // line is unterminated: recover the same way rule 4 does.
        if let LexState::DoubleQuotedString | LexState::SingleQuotedString = state {
            let quote = if state == LexState::DoubleQuotedString {
                '"'
            } else {
                '\''
            };
            if scan_literal(line, quote) == LiteralEnd::Unterminated {
                if !line.is_empty() {
                    scanner.push(line.len(), TokenClass::StringInvalid);
                }
                scanner.state = LexState::Root;
            }
        }

        while scanner.pos < line.len() {
            match scanner.state {
                LexState::Root => self.scan_root(&mut scanner),
                LexState::BlockComment => self.scan_block_comment(&mut scanner),
                LexState::DoubleQuotedString => Self::scan_string(&mut scanner, '"'),
                LexState::SingleQuotedString => Self::scan_string(&mut scanner, '\''),
            }
        }

        LineTokens {
            tokens: scanner.tokens,
            end_state: scanner.state,
        }
    }

    fn scan_root(&self, s: &mut LineScanner<'_>) {
        let rest = s.rest();
        let comments = self.comments;

        if rest.starts_with(comments.line_comment.as_str()) {
            s.push(rest.len(), TokenClass::Comment);
            return;
        }

        if rest.starts_with(comments.block_comment_start.as_str()) {
            let opener = comments.block_comment_start.len();
            match rest[opener..].find(comments.block_comment_end.as_str()) {
                Some(i) => s.push(opener + i + comments.block_comment_end.len(), TokenClass::Comment),
                None => {
                    s.push(rest.len(), TokenClass::Comment);
                    s.state = LexState::BlockComment;
                }
            }
            return;
        }

        let Some(ch) = rest.chars().next() else {
            return;
        };

        if ch.is_whitespace() {
            let len = rest
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(rest.len());
            s.push(len, TokenClass::Whitespace);
            return;
        }

        if ch == '"' || ch == '\'' {
            match scan_literal(&rest[1..], ch) {
                LiteralEnd::Unterminated => s.push(rest.len(), TokenClass::StringInvalid),
                LiteralEnd::Closed | LiteralEnd::Continued => {
                    s.push(1, TokenClass::String);
                    s.state = LexState::for_quote(ch);
                }
            }
            return;
        }

        if let Some((len, class)) = match_number(rest) {
            s.push(len, class);
            return;
        }

        if is_word_start(ch) {
            let len = word_len(rest);
            let class = self.classify_word(&rest[..len]);
            s.push(len, class);
            return;
        }

        let bytes = rest.as_bytes();
        if is_symbol(bytes[0]) {
            let mut len = 1;
            while len < bytes.len() && is_symbol(bytes[len]) {
                let tail = &rest[len..];
                if tail.starts_with(comments.line_comment.as_str())
                    || tail.starts_with(comments.block_comment_start.as_str())
                {
                    break;
                }
                len += 1;
            }
            let class = if self.operators.contains(&rest[..len]) {
                TokenClass::Operator
            } else {
                TokenClass::Default
            };
            s.push(len, class);
            return;
        }

        match ch {
            '(' | ')' | '[' | ']' | '{' | '}' => s.push(1, TokenClass::Bracket),
            ';' | ',' | '.' => s.push(1, TokenClass::Delimiter),
            _ => s.push(ch.len_utf8(), TokenClass::Default),
        }
    }

    fn scan_block_comment(&self, s: &mut LineScanner<'_>) {
        let rest = s.rest();
        let end = self.comments.block_comment_end.as_str();
        match rest.find(end) {
            Some(i) => {
                s.push(i + end.len(), TokenClass::Comment);
                s.state = LexState::Root;
            }
            None => s.push(rest.len(), TokenClass::Comment),
        }
    }

    fn scan_string(s: &mut LineScanner<'_>, quote: char) {
        let rest = s.rest();
        let Some(ch) = rest.chars().next() else {
            return;
        };

        if ch == quote {
            s.push(1, TokenClass::String);
            s.state = LexState::Root;
            return;
        }

        if ch == '\\' {
            let after = &rest[1..];
            match after.chars().next() {
                // Line continuation: the literal resumes on the next line.
                None => s.push(1, TokenClass::StringEscape),
                Some(code) => match escape_len(after) {
                    Some(len) => s.push(1 + len, TokenClass::StringEscape),
                    None => s.push(1 + code.len_utf8(), TokenClass::StringEscapeInvalid),
                },
            }
            return;
        }

        let len = rest
            .find(|c: char| c == '\\' || c == quote)
            .unwrap_or(rest.len());
        s.push(len, TokenClass::String);
    }
}

impl Tokenizer<'static> {
    /// Shared tokenizer for the built-in dialect
    pub fn builtin() -> &'static Tokenizer<'static> {
        static TOKENIZER: OnceLock<Tokenizer<'static>> = OnceLock::new();
        TOKENIZER.get_or_init(|| Tokenizer::from_bundle(builtin_bundle()))
    }
}

/// Lazy per-line tokenization of a buffer
///
/// Cloning yields an independent iterator that resumes from the same line and
/// state.
#[derive(Debug, Clone)]
pub struct Lines<'a> {
    tokenizer: &'a Tokenizer<'a>,
    text: &'a str,
    offset: usize,
    state: LexState,
}

impl<'a> Lines<'a> {
    /// State the next line will be scanned from
    pub fn state(&self) -> LexState {
        self.state
    }

    /// Byte offset where the next line starts
    pub fn offset(&self) -> usize {
        self.offset
    }
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineTokens<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.offset >= self.text.len() {
            return None;
        }

        let rest = &self.text[self.offset..];
        let full_len = rest.find('\n').map_or(rest.len(), |i| i + 1);
        let full = &rest[..full_len];
        let content = match full.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => full,
        };

        let mut line = self.tokenizer.tokenize_line(content, self.state);
        for token in &mut line.tokens {
            token.start += self.offset;
            token.end += self.offset;
        }
        if content.len() < full.len() {
            line.tokens.push(Token {
                text: &full[content.len()..],
                class: TokenClass::Whitespace,
                start: self.offset + content.len(),
                end: self.offset + full_len,
            });
        }

        self.state = line.end_state;
        self.offset += full_len;
        Some(line)
    }
}

impl FusedIterator for Lines<'_> {}

/// Lazy token stream over a whole buffer
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    lines: Lines<'a>,
    current: std::vec::IntoIter<Token<'a>>,
}

impl Tokens<'_> {
    /// State carried out of the most recently scanned line
    pub fn state(&self) -> LexState {
        self.lines.state()
    }
}

impl<'a> Iterator for Tokens<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.current.next() {
                return Some(token);
            }
            let line = self.lines.next()?;
            self.current = line.tokens.into_iter();
        }
    }
}

impl FusedIterator for Tokens<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SymbolEntry;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use quickcheck::{QuickCheck, TestResult};
    use rstest::rstest;

    fn classes(text: &str) -> Vec<(&str, TokenClass)> {
        Tokenizer::builtin()
            .tokenize(text)
            .filter(|t| t.class != TokenClass::Whitespace)
            .map(|t| (t.text, t.class))
            .collect()
    }

    #[test]
    fn test_select_statement() {
        assert_eq!(
            classes("SELECT avg(temperature) FROM demo"),
            vec![
                ("SELECT", TokenClass::Keyword),
                ("avg", TokenClass::Function),
                ("(", TokenClass::Bracket),
                ("temperature", TokenClass::Identifier),
                (")", TokenClass::Bracket),
                ("FROM", TokenClass::Keyword),
                ("demo", TokenClass::Identifier),
            ]
        );
    }

    #[test]
    fn test_create_stream_statement() {
        let sql = r#"CREATE STREAM demo (id BIGINT) WITH (DATASOURCE="topic", FORMAT="json");"#;
        let tokens = classes(sql);
        assert!(tokens.contains(&("BIGINT", TokenClass::Type)));
        assert!(tokens.contains(&("DATASOURCE", TokenClass::StreamOption)));
        assert!(tokens.contains(&("FORMAT", TokenClass::StreamOption)));
        assert!(tokens.contains(&("=", TokenClass::Operator)));
        assert_eq!(tokens.last(), Some(&(";", TokenClass::Delimiter)));
    }

    #[test]
    fn test_window_function_distinct_from_function() {
        let tokens = classes("GROUP BY TUMBLINGWINDOW(ss, 10), count(*)");
        assert!(tokens.contains(&("TUMBLINGWINDOW", TokenClass::WindowFunction)));
        assert!(tokens.contains(&("count", TokenClass::Function)));
    }

    #[rstest]
    #[case("1.5")]
    #[case(".5")]
    #[case("10.25e3")]
    #[case("2.0E-3")]
    fn test_float_is_single_token(#[case] text: &str) {
        assert_eq!(classes(text), vec![(text, TokenClass::NumberFloat)]);
    }

    #[test]
    fn test_integer_and_trailing_dot() {
        assert_eq!(
            classes("42 1."),
            vec![
                ("42", TokenClass::NumberInt),
                ("1", TokenClass::NumberInt),
                (".", TokenClass::Delimiter),
            ]
        );
    }

    #[test]
    fn test_exponent_without_digits_is_not_consumed() {
        assert_eq!(
            classes("1.5e"),
            vec![("1.5", TokenClass::NumberFloat), ("e", TokenClass::Identifier)]
        );
    }

    #[rstest]
    #[case("AVG")]
    #[case("avg")]
    #[case("Avg")]
    fn test_function_case_insensitive(#[case] name: &str) {
        assert_eq!(classes(name), vec![(name, TokenClass::Function)]);
    }

    #[test]
    fn test_keyword_wins_over_function() {
        let catalog = SymbolCatalog::builder()
            .keyword("SPAN")
            .function(SymbolEntry::new("span", "span(x)", "overlapping name"))
            .build();
        let config = DialectConfig::default();
        let tokenizer = Tokenizer::new(&catalog, &config);
        let token = tokenizer.tokenize("span").next().unwrap();
        assert_eq!(token.class, TokenClass::Keyword);
    }

    #[test]
    fn test_stream_option_wins_over_function() {
        let catalog = SymbolCatalog::builder()
            .stream_option("FORMAT")
            .function(SymbolEntry::new("format", "format(x)", "overlapping name"))
            .build();
        let config = DialectConfig::default();
        let tokenizer = Tokenizer::new(&catalog, &config);
        assert_eq!(tokenizer.classify_word("Format"), TokenClass::StreamOption);
    }

    #[test]
    fn test_line_comment() {
        assert_eq!(
            classes("SELECT 1 -- trailing note"),
            vec![
                ("SELECT", TokenClass::Keyword),
                ("1", TokenClass::NumberInt),
                ("-- trailing note", TokenClass::Comment),
            ]
        );
    }

    #[test]
    fn test_comment_opener_ends_symbol_run() {
        assert_eq!(
            classes("a=--c"),
            vec![
                ("a", TokenClass::Identifier),
                ("=", TokenClass::Operator),
                ("--c", TokenClass::Comment),
            ]
        );
    }

    #[test]
    fn test_block_comment_on_one_line() {
        assert_eq!(
            classes("a /* note */ b"),
            vec![
                ("a", TokenClass::Identifier),
                ("/* note */", TokenClass::Comment),
                ("b", TokenClass::Identifier),
            ]
        );
    }

    #[test]
    fn test_block_comment_opener_does_not_close_itself() {
        let tokenizer = Tokenizer::builtin();
        let line = tokenizer.tokenize_line("/*/", LexState::Root);
        assert_eq!(line.end_state, LexState::BlockComment);
    }

    #[test]
    fn test_block_comment_spans_lines() {
        let sql = indoc! {"
            SELECT /* first
            still comment
            end */ id
        "};
        let lines: Vec<_> = Tokenizer::builtin().lines(sql).collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].end_state, LexState::BlockComment);
        assert_eq!(lines[1].end_state, LexState::BlockComment);
        assert_eq!(lines[1].tokens[0].text, "still comment");
        assert_eq!(lines[1].tokens[0].class, TokenClass::Comment);
        assert_eq!(lines[2].end_state, LexState::Root);
        assert_eq!(lines[2].tokens[0].text, "end */");
        assert_eq!(lines[2].tokens[2].text, "id");
        assert_eq!(lines[2].tokens[2].class, TokenClass::Identifier);
    }

    #[test]
    fn test_unterminated_string_recovers_on_next_line() {
        let lines: Vec<_> = Tokenizer::builtin().lines("SELECT \"abc\nFROM demo").collect();
        let first: Vec<_> = lines[0]
            .tokens
            .iter()
            .map(|t| (t.text, t.class))
            .collect();
        assert_eq!(
            first,
            vec![
                ("SELECT", TokenClass::Keyword),
                (" ", TokenClass::Whitespace),
                ("\"abc", TokenClass::StringInvalid),
                ("\n", TokenClass::Whitespace),
            ]
        );
        assert_eq!(lines[0].end_state, LexState::Root);
        assert_eq!(lines[1].tokens[0].class, TokenClass::Keyword);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            classes(r#""a\nb\qc\x41\u00e9""#),
            vec![
                ("\"", TokenClass::String),
                ("a", TokenClass::String),
                ("\\n", TokenClass::StringEscape),
                ("b", TokenClass::String),
                ("\\q", TokenClass::StringEscapeInvalid),
                ("c", TokenClass::String),
                ("\\x41", TokenClass::StringEscape),
                ("\\u00e9", TokenClass::StringEscape),
                ("\"", TokenClass::String),
            ]
        );
    }

    #[test]
    fn test_escaped_quote_does_not_close() {
        assert_eq!(
            classes(r"'it\'s'"),
            vec![
                ("'", TokenClass::String),
                ("it", TokenClass::String),
                ("\\'", TokenClass::StringEscape),
                ("s", TokenClass::String),
                ("'", TokenClass::String),
            ]
        );
    }

    #[test]
    fn test_other_quote_inside_literal() {
        assert_eq!(
            classes(r#""it's""#),
            vec![
                ("\"", TokenClass::String),
                ("it's", TokenClass::String),
                ("\"", TokenClass::String),
            ]
        );
    }

    #[test]
    fn test_line_continuation_carries_string_state() {
        let lines: Vec<_> = Tokenizer::builtin().lines("'abc\\\ndef' x").collect();
        assert_eq!(lines[0].end_state, LexState::SingleQuotedString);
        let second: Vec<_> = lines[1]
            .tokens
            .iter()
            .map(|t| (t.text, t.class))
            .collect();
        assert_eq!(
            second,
            vec![
                ("def", TokenClass::String),
                ("'", TokenClass::String),
                (" ", TokenClass::Whitespace),
                ("x", TokenClass::Identifier),
            ]
        );
        assert_eq!(lines[1].end_state, LexState::Root);
    }

    #[test]
    fn test_continued_literal_left_open_is_invalid() {
        let tokenizer = Tokenizer::builtin();
        let line = tokenizer.tokenize_line("def", LexState::DoubleQuotedString);
        assert_eq!(line.tokens.len(), 1);
        assert_eq!(line.tokens[0].class, TokenClass::StringInvalid);
        assert_eq!(line.end_state, LexState::Root);

        let empty = tokenizer.tokenize_line("", LexState::DoubleQuotedString);
        assert!(empty.tokens.is_empty());
        assert_eq!(empty.end_state, LexState::Root);
    }

    #[test]
    fn test_operators_and_default_runs() {
        assert_eq!(
            classes("a <> b >- c"),
            vec![
                ("a", TokenClass::Identifier),
                ("<>", TokenClass::Operator),
                ("b", TokenClass::Identifier),
                (">-", TokenClass::Default),
                ("c", TokenClass::Identifier),
            ]
        );
    }

    #[test]
    fn test_unmatched_characters_are_default() {
        assert_eq!(
            classes("@é#"),
            vec![
                ("@", TokenClass::Default),
                ("é", TokenClass::Default),
                ("#", TokenClass::Default),
            ]
        );
    }

    #[test]
    fn test_crlf_terminators_are_whitespace() {
        let tokens: Vec<_> = Tokenizer::builtin().tokenize("a\r\nb").collect();
        assert_eq!(tokens[1].text, "\r\n");
        assert_eq!(tokens[1].class, TokenClass::Whitespace);
        assert_eq!(tokens[2].start, 3);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(Tokenizer::builtin().tokenize("").count(), 0);
    }

    #[test]
    fn test_clone_restarts_from_same_point() {
        let tokenizer = Tokenizer::builtin();
        let mut tokens = tokenizer.tokenize("SELECT a,\n b FROM demo");
        tokens.next();
        let rest_a: Vec<_> = tokens.clone().collect();
        let rest_b: Vec<_> = tokens.collect();
        assert_eq!(rest_a, rest_b);
    }

    fn spans_tile(text: &str) -> bool {
        let mut expected_start = 0;
        let mut rebuilt = String::with_capacity(text.len());
        for token in Tokenizer::builtin().tokenize(text) {
            if token.start != expected_start || token.end <= token.start {
                return false;
            }
            if &text[token.range()] != token.text {
                return false;
            }
            rebuilt.push_str(token.text);
            expected_start = token.end;
        }
        expected_start == text.len() && rebuilt == text
    }

    #[test]
    fn test_total_coverage_examples() {
        for text in [
            "",
            "   \t  ",
            "\n\n\r\n",
            "SELECT \"unterminated",
            "/* open\nstill\n",
            "'a\\",
            "\"\\",
            "1.5.3e+",
            "\u{0}\u{7f}\u{ffff}",
        ] {
            assert!(spans_tile(text), "tokens do not tile {text:?}");
        }
    }

    #[rstest]
    #[case("SELECT avg(x)", &["SELECT", "avg", "x"])]
    #[case("2avg 1.5e3x .5y", &["avg", "x", "y"])]
    #[case("éavg avgé a2b _c", &["avg", "avg", "a2b", "_c"])]
    #[case("1e5avg", &["e5avg"])]
    #[case("", &[])]
    fn test_word_spans(#[case] line: &str, #[case] expected: &[&str]) {
        let words: Vec<_> = word_spans(line).map(|span| &line[span]).collect();
        assert_eq!(words, expected);
    }

    #[test]
    fn test_word_spans_match_word_tokens() {
        fn prop(text: String) -> TestResult {
            let line: String = text.chars().filter(|ch| *ch != '\n').collect();
            let spans: Vec<_> = word_spans(&line).collect();
            let scanned = Tokenizer::builtin().tokenize_line(&line, LexState::Root);
            let consistent = scanned
                .tokens
                .iter()
                .filter(|token| {
                    matches!(
                        token.class,
                        TokenClass::Keyword
                            | TokenClass::Type
                            | TokenClass::StreamOption
                            | TokenClass::Function
                            | TokenClass::WindowFunction
                            | TokenClass::Identifier
                    )
                })
                .all(|token| spans.contains(&token.range()));
            TestResult::from_bool(consistent)
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(String) -> TestResult);
    }

    #[test]
    fn test_total_coverage_property() {
        fn prop(text: String) -> TestResult {
            TestResult::from_bool(spans_tile(&text))
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(String) -> TestResult);
    }

    #[test]
    fn test_total_coverage_on_binary_garbage() {
        fn prop(bytes: Vec<u8>) -> TestResult {
            let text = String::from_utf8_lossy(&bytes);
            TestResult::from_bool(spans_tile(&text))
        }
        QuickCheck::new()
            .tests(500)
            .quickcheck(prop as fn(Vec<u8>) -> TestResult);
    }

    #[test]
    fn test_idempotence_property() {
        fn prop(text: String) -> TestResult {
            let tokenizer = Tokenizer::builtin();
            let first: Vec<_> = tokenizer.tokenize(&text).collect();
            let second: Vec<_> = tokenizer.tokenize(&text).collect();
            TestResult::from_bool(first == second)
        }
        QuickCheck::new()
            .tests(300)
            .quickcheck(prop as fn(String) -> TestResult);
    }
}
