//! Signature help for function and window function calls

use lsp_types::{
    Documentation, MarkupContent, MarkupKind, ParameterInformation, ParameterLabel, Position,
    SignatureHelp, SignatureInformation,
};
use ropey::Rope;
use std::sync::Arc;
use streamsql_core::TokenClass;

use crate::StreamSqlLsp;
use crate::position::position_to_char;
use crate::provider::SignatureHelpProvider;

/// An open parenthesis seen before the cursor
struct OpenParen<'a> {
    /// Callee when the parenthesis directly follows a name
    callee: Option<&'a str>,
    commas: usize,
}

impl StreamSqlLsp {
    /// Signature of the innermost call whose argument list holds `position`
    pub fn get_signature_help(&self, text: &Rope, position: Position) -> Option<SignatureHelp> {
        let Some(char_idx) = position_to_char(text, position) else {
            tracing::debug!(?position, "Signature help position outside buffer");
            return None;
        };
        let before_cursor = text.slice(..char_idx).to_string();

        let (name, active_param) = self.find_call_context(&before_cursor)?;
        tracing::debug!(func = %name, active_param, "Found function call context");

        let (_, entry) = self.catalog().documented(&name)?;
        let parameters = entry
            .parameters()
            .into_iter()
            .map(|param| ParameterInformation {
                label: ParameterLabel::Simple(param.to_string()),
                documentation: None,
            })
            .collect();

        let signature = SignatureInformation {
            label: entry.signature.to_string(),
            documentation: Some(Documentation::MarkupContent(MarkupContent {
                kind: MarkupKind::Markdown,
                value: entry.description.to_string(),
            })),
            parameters: Some(parameters),
            active_parameter: None,
        };

        Some(SignatureHelp {
            signatures: vec![signature],
            active_signature: Some(0),
            active_parameter: Some(active_param as u32),
        })
    }

    /// Callee name and argument index of the innermost open call in `text`
    ///
    /// Works on tokens, so parentheses and commas inside strings and comments
    /// are ignored.
    fn find_call_context(&self, text: &str) -> Option<(String, usize)> {
        let tokenizer = self.tokenizer();
        let mut open: Vec<OpenParen<'_>> = Vec::new();
        let mut previous = None;

        for token in tokenizer.tokenize(text) {
            match (token.class, token.text) {
                (TokenClass::Bracket, "(") => {
                    let callee = previous
                        .filter(|(class, _)| {
                            matches!(
                                class,
                                TokenClass::Function
                                    | TokenClass::WindowFunction
                                    | TokenClass::Identifier
                            )
                        })
                        .map(|(_, text)| text);
                    open.push(OpenParen { callee, commas: 0 });
                }
                (TokenClass::Bracket, ")") => {
                    open.pop();
                }
                (TokenClass::Delimiter, ",") => {
                    if let Some(paren) = open.last_mut() {
                        paren.commas += 1;
                    }
                }
                _ => {}
            }

            if !token.class.is_trivia() {
                previous = Some((token.class, token.text));
            }
        }

        open.iter()
            .rev()
            .find_map(|paren| paren.callee.map(|name| (name.to_string(), paren.commas)))
    }
}

pub struct StreamSqlSignatureHelpProvider {
    lsp: Arc<StreamSqlLsp>,
}

impl StreamSqlSignatureHelpProvider {
    pub fn new(lsp: Arc<StreamSqlLsp>) -> Self {
        Self { lsp }
    }
}

impl SignatureHelpProvider for StreamSqlSignatureHelpProvider {
    fn signature_help(&self, text: &Rope, position: Position) -> Option<SignatureHelp> {
        self.lsp.get_signature_help(text, position)
    }

    fn trigger_characters(&self) -> &[&str] {
        &["(", ","]
    }
}
