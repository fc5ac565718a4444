//! Scanning documents for matching fields.
//!
//! Runs the walker over every operation's parameters, request body and
//! responses, in that order, and keeps the operations that produced matches.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::dialect::{normalize, NormalizedDocument};
use crate::error::{DialectError, ScanError};
use crate::loader::load_document_auto;
use crate::matcher::FieldMatcher;
use crate::operations::{MediaSchema, Operation, OperationEnumerator, Parameter};
use crate::types::{ApiRecord, Dialect, FieldMatch, ScanOptions};
use crate::walker::SchemaWalker;

/// Result of scanning one document.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub dialect: Dialect,
    pub service_name: String,
    pub base_url: String,
    /// Number of operations inspected, with or without matches.
    pub operations_scanned: usize,
    /// Operations with at least one match, in declaration order.
    pub records: Vec<ApiRecord>,
}

impl ScanReport {
    /// Total number of matches across all records.
    pub fn match_count(&self) -> usize {
        self.records.iter().map(|r| r.matches.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Scan an already-parsed document.
///
/// # Errors
///
/// Returns `DialectError` if the document is not Swagger 2.0 or OpenAPI 3.x.
/// Malformed content inside a recognized document never fails the scan.
pub fn scan(document: &Value, matcher: &FieldMatcher) -> Result<ScanReport, DialectError> {
    let normalized = normalize(document)?;
    let operations = OperationEnumerator::extract(&normalized);
    let walker = SchemaWalker::new(normalized.schema_store, matcher);

    let records: Vec<ApiRecord> = operations
        .iter()
        .filter_map(|op| collect_record(&normalized, &walker, op))
        .collect();

    debug!(
        operations = operations.len(),
        records = records.len(),
        "scan complete"
    );

    Ok(ScanReport {
        dialect: normalized.dialect,
        service_name: normalized.service_name,
        base_url: normalized.base_url,
        operations_scanned: operations.len(),
        records,
    })
}

/// Load a document from a file path or URL and scan it.
///
/// Patterns are compiled before the document is read, so an invalid pattern
/// fails without touching the source.
///
/// # Errors
///
/// Returns `ScanError::Pattern`, `ScanError::Load` or `ScanError::Dialect`.
pub fn scan_source(source: &str, options: &ScanOptions) -> Result<ScanReport, ScanError> {
    let matcher = options.matcher()?;
    let document = load_document_auto(source)?;
    Ok(scan(&document, &matcher)?)
}

/// Matches for one operation, or `None` when it has none.
fn collect_record<'a>(
    document: &NormalizedDocument<'a>,
    walker: &SchemaWalker<'a>,
    op: &Operation<'a>,
) -> Option<ApiRecord> {
    let mut matches = Vec::new();

    for param in &op.parameters {
        matches.extend(parameter_matches(walker, param));
    }

    if let Some(body) = &op.request_body {
        for media in body {
            let location = format!("requestBody({})", media_label(media));
            matches.extend(walker.walk(media.schema, &location, ""));
        }
    }

    for response in &op.responses {
        for media in &response.content {
            let location = match &media.media_type {
                Some(media_type) => format!("response({},{})", response.status_code, media_type),
                None => format!("response({})", response.status_code),
            };
            matches.extend(walker.walk(media.schema, &location, ""));
        }
    }

    if matches.is_empty() {
        return None;
    }

    debug!(
        method = %op.method,
        path = %op.path,
        matches = matches.len(),
        "operation has matching fields"
    );

    Some(ApiRecord {
        dialect: document.dialect,
        service_name: op.service_name.clone(),
        path: op.path.clone(),
        method: op.method,
        description: op.description.clone(),
        matches,
    })
}

/// The parameter itself when its name matches, then anything under its schema.
fn parameter_matches<'a>(walker: &SchemaWalker<'a>, param: &Parameter<'a>) -> Vec<FieldMatch> {
    let location = format!("{} parameter", param.location);
    let mut matches = Vec::new();

    if walker.matches_name(&param.name) {
        matches.push(FieldMatch {
            field_path: param.name.clone(),
            field_type: param.param_type.clone(),
            description: param.description.clone(),
            location: location.clone(),
        });
    }

    if let Some(schema) = param.schema {
        matches.extend(walker.walk(schema, &location, &param.name));
    }

    matches
}

fn media_label<'m>(media: &'m MediaSchema<'_>) -> &'m str {
    media.media_type.as_deref().unwrap_or_default()
}
