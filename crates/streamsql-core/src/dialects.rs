//! Built-in Stream SQL dialect
//!
//! The dialect files are embedded at compile time and parsed on first access.
//! The resulting bundle is immutable and shared for the life of the process.

use crate::dialect::SymbolCatalog;
use crate::dialect_config::DialectBundle;
use std::sync::OnceLock;

/// Embedded dialect configuration files
const CONFIG_TOML: &str = include_str!("../dialect/config.toml");
const COMPLETIONS_TOML: &str = include_str!("../dialect/completions.toml");

/// Cached dialect bundle - loaded once on first access
pub fn builtin_bundle() -> &'static DialectBundle {
    static BUNDLE: OnceLock<DialectBundle> = OnceLock::new();
    BUNDLE.get_or_init(|| {
        let bundle = DialectBundle::from_toml(CONFIG_TOML, COMPLETIONS_TOML)
            .expect("embedded Stream SQL dialect files must parse");

        let catalog = bundle.catalog();
        tracing::info!(
            dialect = bundle.id(),
            keywords = catalog.keywords().count(),
            data_types = catalog.data_types().count(),
            stream_options = catalog.stream_options().count(),
            functions = catalog.functions().count(),
            window_functions = catalog.window_functions().count(),
            "Loaded built-in dialect"
        );

        bundle
    })
}

/// Symbol catalog of the built-in dialect
pub fn builtin_catalog() -> &'static SymbolCatalog {
    builtin_bundle().catalog()
}
