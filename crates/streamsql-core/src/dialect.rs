//! Dialect Symbol Tables
//!
//! This module defines the static catalogs the language service classifies
//! and documents against: keywords, data types, stream options, functions and
//! window functions.
//!
//! Every set is keyed by the ASCII-lowercased name so lookups are
//! case-insensitive and O(1), while insertion order is preserved for
//! completion listings.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;

/// The role a name plays in the dialect
///
/// Variants are declared in classification precedence order (see
/// [`SymbolKind::PRECEDENCE`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SymbolKind {
    /// Statement keywords (SELECT, CREATE, WHERE, ...)
    Keyword,
    /// Column data types (BIGINT, STRING, ...)
    DataType,
    /// Stream/table declaration options (DATASOURCE, FORMAT, ...)
    StreamOption,
    /// Scalar and aggregate functions
    Function,
    /// Windowing functions used in GROUP BY
    WindowFunction,
}

impl SymbolKind {
    /// Order in which identifier-shaped words are tested against the catalogs.
    ///
    /// A word present in several sets resolves to the first set listed here.
    pub const PRECEDENCE: [SymbolKind; 5] = [
        SymbolKind::Keyword,
        SymbolKind::DataType,
        SymbolKind::StreamOption,
        SymbolKind::Function,
        SymbolKind::WindowFunction,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Keyword => "Keyword",
            Self::DataType => "Data Type",
            Self::StreamOption => "Stream Option",
            Self::Function => "Function",
            Self::WindowFunction => "Window Function",
        }
    }
}

/// Categories of dialect functions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FunctionCategory {
    /// Aggregate functions (AVG, COUNT, COLLECT, ...)
    Aggregate,
    /// Mathematical functions (ABS, ROUND, ...)
    Math,
    /// String functions (CONCAT, LOWER, ...)
    String,
    /// Hashing functions (MD5, SHA256, ...)
    Hashing,
    /// Type conversion (CAST, ENCODE, ...)
    Conversion,
    /// Date/time functions (NOW, FORMAT_TIME, ...)
    Datetime,
    /// JSON path functions
    Json,
    /// Window spans (TUMBLINGWINDOW, ...)
    Window,
    /// Other
    #[default]
    Other,
}

/// A documented catalog entry for a function or window function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolEntry {
    /// Function name as declared (e.g., "avg", "TUMBLINGWINDOW")
    pub name: Cow<'static, str>,
    /// Full signature for display (e.g., "avg(col)")
    pub signature: Cow<'static, str>,
    /// One-paragraph description
    pub description: Cow<'static, str>,
    /// Worked example, shown for window functions
    pub example: Option<Cow<'static, str>>,
    /// Grouping category
    pub category: FunctionCategory,
}

impl SymbolEntry {
    pub const fn new(
        name: &'static str,
        signature: &'static str,
        description: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            signature: Cow::Borrowed(signature),
            description: Cow::Borrowed(description),
            example: None,
            category: FunctionCategory::Other,
        }
    }

    pub fn with_example(mut self, example: impl Into<Cow<'static, str>>) -> Self {
        self.example = Some(example.into());
        self
    }

    pub fn with_category(mut self, category: FunctionCategory) -> Self {
        self.category = category;
        self
    }

    /// Parameter names parsed from the parenthesised part of the signature
    ///
    /// `"hoppingwindow(timeunit, size, interval)"` yields
    /// `["timeunit", "size", "interval"]`. Signatures without parentheses or
    /// with an empty argument list yield nothing.
    pub fn parameters(&self) -> Vec<&str> {
        let sig = self.signature.as_ref();
        let Some(open) = sig.find('(') else {
            return Vec::new();
        };
        let Some(close) = sig.rfind(')') else {
            return Vec::new();
        };
        if close <= open {
            return Vec::new();
        }

        let inner = &sig[open + 1..close];
        let mut params = Vec::new();
        let mut depth = 0usize;
        let mut start = 0;
        for (i, ch) in inner.char_indices() {
            match ch {
                '(' | '[' => depth += 1,
                ')' | ']' => depth = depth.saturating_sub(1),
                ',' if depth == 0 => {
                    params.push(inner[start..i].trim());
                    start = i + 1;
                }
                _ => {}
            }
        }
        params.push(inner[start..].trim());
        params.retain(|p| !p.is_empty());
        params
    }
}

/// The five symbol sets of a dialect
///
/// Built once (from the embedded dialect bundle or a [`CatalogBuilder`]) and
/// shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct SymbolCatalog {
    keywords: IndexMap<String, Cow<'static, str>>,
    data_types: IndexMap<String, Cow<'static, str>>,
    stream_options: IndexMap<String, Cow<'static, str>>,
    functions: IndexMap<String, SymbolEntry>,
    window_functions: IndexMap<String, SymbolEntry>,
}

fn fold(name: &str) -> String {
    name.to_ascii_lowercase()
}

impl SymbolCatalog {
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.keywords.values().map(|k| k.as_ref())
    }

    pub fn data_types(&self) -> impl Iterator<Item = &str> {
        self.data_types.values().map(|t| t.as_ref())
    }

    pub fn stream_options(&self) -> impl Iterator<Item = &str> {
        self.stream_options.values().map(|o| o.as_ref())
    }

    pub fn functions(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.functions.values()
    }

    pub fn window_functions(&self) -> impl Iterator<Item = &SymbolEntry> {
        self.window_functions.values()
    }

    pub fn is_keyword(&self, word: &str) -> bool {
        self.keywords.contains_key(&fold(word))
    }

    pub fn is_data_type(&self, word: &str) -> bool {
        self.data_types.contains_key(&fold(word))
    }

    pub fn is_stream_option(&self, word: &str) -> bool {
        self.stream_options.contains_key(&fold(word))
    }

    pub fn function(&self, word: &str) -> Option<&SymbolEntry> {
        self.functions.get(&fold(word))
    }

    pub fn window_function(&self, word: &str) -> Option<&SymbolEntry> {
        self.window_functions.get(&fold(word))
    }

    fn contains(&self, kind: SymbolKind, folded: &str) -> bool {
        match kind {
            SymbolKind::Keyword => self.keywords.contains_key(folded),
            SymbolKind::DataType => self.data_types.contains_key(folded),
            SymbolKind::StreamOption => self.stream_options.contains_key(folded),
            SymbolKind::Function => self.functions.contains_key(folded),
            SymbolKind::WindowFunction => self.window_functions.contains_key(folded),
        }
    }

    /// Classify an identifier-shaped word
    ///
    /// Sets are tested in [`SymbolKind::PRECEDENCE`] order; `None` means the
    /// word is a plain identifier.
    pub fn classify(&self, word: &str) -> Option<SymbolKind> {
        let folded = fold(word);
        SymbolKind::PRECEDENCE
            .into_iter()
            .find(|kind| self.contains(*kind, &folded))
    }

    /// Resolve a word to its documentation entry
    ///
    /// Functions are searched before window functions, so a name present in
    /// both resolves as a function.
    pub fn documented(&self, word: &str) -> Option<(SymbolKind, &SymbolEntry)> {
        let folded = fold(word);
        if let Some(entry) = self.functions.get(&folded) {
            return Some((SymbolKind::Function, entry));
        }
        self.window_functions
            .get(&folded)
            .map(|entry| (SymbolKind::WindowFunction, entry))
    }

    /// Names present in more than one set, with every set they belong to
    pub fn overlaps(&self) -> Vec<(String, Vec<SymbolKind>)> {
        let mut seen: IndexMap<&str, Vec<SymbolKind>> = IndexMap::new();
        let sets = [
            (SymbolKind::Keyword, self.keywords.keys().collect::<Vec<_>>()),
            (SymbolKind::DataType, self.data_types.keys().collect()),
            (SymbolKind::StreamOption, self.stream_options.keys().collect()),
            (SymbolKind::Function, self.functions.keys().collect()),
            (SymbolKind::WindowFunction, self.window_functions.keys().collect()),
        ];
        for (kind, names) in sets {
            for name in names {
                seen.entry(name.as_str()).or_default().push(kind);
            }
        }

        seen.into_iter()
            .filter(|(_, kinds)| kinds.len() > 1)
            .map(|(name, kinds)| (name.to_string(), kinds))
            .collect()
    }

    /// Total number of names across all sets
    pub fn len(&self) -> usize {
        self.keywords.len()
            + self.data_types.len()
            + self.stream_options.len()
            + self.functions.len()
            + self.window_functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Incremental constructor for [`SymbolCatalog`]
///
/// Duplicate names within one set keep their first declaration.
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: SymbolCatalog,
}

impl CatalogBuilder {
    pub fn keyword(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        self.catalog.keywords.entry(fold(&name)).or_insert(name);
        self
    }

    pub fn keywords<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        names.into_iter().fold(self, |b, n| b.keyword(n))
    }

    pub fn data_type(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        self.catalog.data_types.entry(fold(&name)).or_insert(name);
        self
    }

    pub fn data_types<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        names.into_iter().fold(self, |b, n| b.data_type(n))
    }

    pub fn stream_option(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        self.catalog.stream_options.entry(fold(&name)).or_insert(name);
        self
    }

    pub fn stream_options<I, S>(self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Cow<'static, str>>,
    {
        names.into_iter().fold(self, |b, n| b.stream_option(n))
    }

    pub fn function(mut self, entry: SymbolEntry) -> Self {
        self.catalog
            .functions
            .entry(fold(&entry.name))
            .or_insert(entry);
        self
    }

    pub fn window_function(mut self, entry: SymbolEntry) -> Self {
        self.catalog
            .window_functions
            .entry(fold(&entry.name))
            .or_insert(entry);
        self
    }

    pub fn build(self) -> SymbolCatalog {
        self.catalog
    }
}
