//! Catalog and price document loading
//!
//! Documents are YAML or JSON. A catalog is either a bare list of categories
//! or a mapping with a `categories` key; a price document is either a bare
//! list of priced parts or a mapping with a `parts` key. A missing or `null`
//! list loads as empty.

use miette::Diagnostic;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::diagnostics::DocumentSyntaxError;
use crate::entities::{Category, CheckedPart};

/// Errors raised while reading catalog or price documents
#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    #[diagnostic(code(repmat::catalog::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] DocumentSyntaxError),

    #[error("{name}: {message}")]
    #[diagnostic(
        code(repmat::catalog::shape),
        help("expected a list of {expected}, or a mapping with a '{key}' list")
    )]
    Shape {
        name: String,
        message: String,
        expected: &'static str,
        key: &'static str,
    },
}

/// Document encoding, chosen by file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// `.json` files are JSON, everything else is read as YAML
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => DocumentFormat::Json,
            _ => DocumentFormat::Yaml,
        }
    }
}

/// Shape description for one document kind
struct DocumentKind {
    key: &'static str,
    expected: &'static str,
}

const CATALOG: DocumentKind = DocumentKind {
    key: "categories",
    expected: "categories",
};

const PRICES: DocumentKind = DocumentKind {
    key: "parts",
    expected: "priced parts",
};

/// Load a catalog file
pub fn load_catalog(path: &Path) -> Result<Vec<Category>, CatalogError> {
    let source = read(path)?;
    parse_catalog(&source, &path.display().to_string(), DocumentFormat::from_path(path))
}

/// Parse a catalog document
pub fn parse_catalog(
    source: &str,
    name: &str,
    format: DocumentFormat,
) -> Result<Vec<Category>, CatalogError> {
    let categories: Vec<Category> = parse_list(source, name, format, &CATALOG)?;
    let skipped = categories.iter().filter(|c| c.repair_types.is_none()).count();
    if skipped > 0 {
        tracing::warn!(
            document = name,
            skipped,
            "categories without repair-types will not appear in the matrix"
        );
    }
    Ok(categories)
}

/// Load a price file
pub fn load_prices(path: &Path) -> Result<Vec<CheckedPart>, CatalogError> {
    let source = read(path)?;
    parse_prices(&source, &path.display().to_string(), DocumentFormat::from_path(path))
}

/// Parse a price document
pub fn parse_prices(
    source: &str,
    name: &str,
    format: DocumentFormat,
) -> Result<Vec<CheckedPart>, CatalogError> {
    parse_list(source, name, format, &PRICES)
}

fn read(path: &Path) -> Result<String, CatalogError> {
    fs::read_to_string(path).map_err(|source| CatalogError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_list<T: DeserializeOwned + 'static>(
    source: &str,
    name: &str,
    format: DocumentFormat,
    kind: &DocumentKind,
) -> Result<Vec<T>, CatalogError> {
    let shape_error = |message: String| CatalogError::Shape {
        name: name.to_string(),
        message,
        expected: kind.expected,
        key: kind.key,
    };

    match format {
        DocumentFormat::Yaml => {
            let value: serde_yml::Value = serde_yml::from_str(source)
                .map_err(|e| DocumentSyntaxError::from_yaml(&e, source, name))?;
            let list = match value {
                serde_yml::Value::Mapping(mut map) => {
                    map.remove(kind.key).unwrap_or(serde_yml::Value::Null)
                }
                other => other,
            };
            if list.is_null() {
                return Ok(Vec::new());
            }
            serde_yml::from_value(list).map_err(|e| shape_error(e.to_string()))
        }
        DocumentFormat::Json => {
            let value: serde_json::Value = serde_json::from_str(source)
                .map_err(|e| DocumentSyntaxError::from_json(&e, source, name))?;
            let list = match value {
                serde_json::Value::Object(mut map) => {
                    map.remove(kind.key).unwrap_or(serde_json::Value::Null)
                }
                other => other,
            };
            if list.is_null() {
                return Ok(Vec::new());
            }
            serde_json::from_value(list).map_err(|e| shape_error(e.to_string()))
        }
    }
}
