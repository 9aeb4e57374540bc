//! Stream SQL LSP Tests
//!
//! Organized by category:
//! - test_helpers: Common test utilities and fixtures
//! - test_completions: Tests for completion items and their content
//! - test_completion_range: Tests for completion text replacement ranges
//! - test_hover: Tests for hover documentation
//! - test_signature_help: Tests for call signature help
//! - test_diagnostics_bridge: Tests for marker forwarding
//! - test_classification_consistency: Tests that tokenizer classes and hover agree


#[cfg(test)]
mod test_completions;
