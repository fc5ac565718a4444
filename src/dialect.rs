//! Dialect detection and normalization of Swagger 2.0 / OpenAPI 3.x documents.
//!
//! Everything that differs between the two families (where schemas live, how
//! the base URL is declared, which `$ref` prefix points into the schema store)
//! is resolved here, once, so the walker never has to know which dialect it is in.

use std::borrow::Cow;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::DialectError;
use crate::types::Dialect;

/// Name-to-schema lookup for one document's local definitions.
///
/// Borrowed from the document and never mutated.
#[derive(Debug, Clone, Copy)]
pub struct SchemaStore<'a> {
    prefix: &'static str,
    schemas: Option<&'a Map<String, Value>>,
}

impl<'a> SchemaStore<'a> {
    /// Build a store over `schemas`, resolving references that start with `prefix`.
    ///
    /// A missing or non-object `schemas` value yields an empty store.
    pub fn new(prefix: &'static str, schemas: Option<&'a Value>) -> Self {
        Self {
            prefix,
            schemas: schemas.and_then(Value::as_object),
        }
    }

    /// Definition name a `$ref` points to, or `None` for references outside the store
    /// (external files, URLs, other JSON pointers).
    ///
    /// JSON Pointer escapes are decoded (`~1` = `/`, `~0` = `~`).
    pub fn ref_name<'r>(&self, reference: &'r str) -> Option<Cow<'r, str>> {
        let name = reference.strip_prefix(self.prefix)?;
        if name.is_empty() {
            return None;
        }
        if name.contains('~') {
            Some(Cow::Owned(name.replace("~1", "/").replace("~0", "~")))
        } else {
            Some(Cow::Borrowed(name))
        }
    }

    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.schemas?.get(name)
    }

    pub fn len(&self) -> usize {
        self.schemas.map_or(0, Map::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A document reduced to what the scanner needs.
#[derive(Debug, Clone)]
pub struct NormalizedDocument<'a> {
    pub dialect: Dialect,
    pub schema_store: SchemaStore<'a>,
    /// `info.title`, or `unknown`.
    pub service_name: String,
    /// `basePath` (Swagger 2.0) or `servers[0].url` (OpenAPI 3.x); empty when absent.
    pub base_url: String,
    /// The `paths` object; `None` when missing or not an object.
    pub paths: Option<&'a Map<String, Value>>,
}

/// Detect the dialect of a document from its top-level version key.
///
/// # Errors
///
/// - `DialectError::UnsupportedVersion` when `swagger` is not `"2.0"` or
///   `openapi` does not start with `"3."`.
/// - `DialectError::UnrecognizedFormat` when neither key is present.
pub fn detect_dialect(document: &Value) -> Result<Dialect, DialectError> {
    if let Some(version) = document.get("swagger") {
        return match version.as_str() {
            Some("2.0") => Ok(Dialect::Swagger2),
            _ => Err(DialectError::UnsupportedVersion {
                key: "swagger",
                version: version_text(version),
            }),
        };
    }

    if let Some(version) = document.get("openapi") {
        return match version.as_str() {
            Some(v) if v.starts_with("3.") => Ok(Dialect::OpenApi3),
            _ => Err(DialectError::UnsupportedVersion {
                key: "openapi",
                version: version_text(version),
            }),
        };
    }

    Err(DialectError::UnrecognizedFormat)
}

/// Detect the dialect and normalize the document.
///
/// # Errors
///
/// Returns the errors of [`detect_dialect`].
pub fn normalize(document: &Value) -> Result<NormalizedDocument<'_>, DialectError> {
    let dialect = detect_dialect(document)?;

    let (schemas, base_url) = match dialect {
        Dialect::Swagger2 => (
            document.get("definitions"),
            document
                .get("basePath")
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
        Dialect::OpenApi3 => (
            document.get("components").and_then(|c| c.get("schemas")),
            document
                .get("servers")
                .and_then(|s| s.get(0))
                .and_then(|s| s.get("url"))
                .and_then(Value::as_str)
                .unwrap_or_default(),
        ),
    };

    let service_name = document
        .get("info")
        .and_then(|info| info.get("title"))
        .and_then(Value::as_str)
        .unwrap_or("unknown")
        .to_string();

    let normalized = NormalizedDocument {
        dialect,
        schema_store: SchemaStore::new(dialect.ref_prefix(), schemas),
        service_name,
        base_url: base_url.to_string(),
        paths: document.get("paths").and_then(Value::as_object),
    };

    debug!(
        dialect = %normalized.dialect,
        service = %normalized.service_name,
        schemas = normalized.schema_store.len(),
        paths = normalized.paths.map_or(0, Map::len),
        "normalized document"
    );

    Ok(normalized)
}

fn version_text(version: &Value) -> String {
    match version {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
