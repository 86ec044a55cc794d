//! Source-annotated diagnostics for catalog and price documents

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Syntax error in a catalog or price document, pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(repmat::catalog::syntax))]
pub struct DocumentSyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    message: String,
}

impl DocumentSyntaxError {
    /// Build from a 1-based line/column location
    pub fn at(
        message: impl Into<String>,
        source: &str,
        name: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let message = message.into();
        let offset = offset_of(source, line, column);
        Self {
            help: hint_for(&message),
            src: NamedSource::new(name, source.to_string()),
            span: SourceSpan::from(offset..(offset + 1).min(source.len())),
            message,
        }
    }

    pub fn from_yaml(err: &serde_yml::Error, source: &str, name: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));
        Self::at(err.to_string(), source, name, line, column)
    }

    pub fn from_json(err: &serde_json::Error, source: &str, name: &str) -> Self {
        Self::at(err.to_string(), source, name, err.line().max(1), err.column().max(1))
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Byte offset of a 1-based line/column, clamped to the source length
fn offset_of(source: &str, line: usize, column: usize) -> usize {
    let line_start: usize = source
        .split_inclusive('\n')
        .take(line.saturating_sub(1))
        .map(str::len)
        .sum();
    let line_text = source[line_start..].lines().next().unwrap_or("");
    let col_offset = line_text
        .char_indices()
        .nth(column.saturating_sub(1))
        .map_or(line_text.len(), |(i, _)| i);
    (line_start + col_offset).min(source.len())
}

fn hint_for(message: &str) -> Option<String> {
    let lower = message.to_lowercase();

    if lower.contains("tab") {
        return Some("Indent with spaces; YAML does not allow tabs.".to_string());
    }
    if lower.contains("duplicate") {
        return Some("Each key may appear only once per mapping.".to_string());
    }
    if lower.contains("trailing comma") {
        return Some("JSON does not allow a comma after the last element.".to_string());
    }
    if lower.contains("eof") || lower.contains("end of") {
        return Some("The document ends early; check for unclosed brackets or quotes.".to_string());
    }

    None
}
