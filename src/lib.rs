//! API Field Finder
//!
//! Finds fields whose names match a set of patterns in Swagger 2.0 and
//! OpenAPI 3.x documents: in operation parameters, request bodies and
//! responses, including fields reachable only through `$ref`s, array items,
//! nested objects and `allOf`/`oneOf`/`anyOf` compositions.
//!
//! # Example
//!
//! ```
//! use api_field_finder::{scan, ScanOptions};
//! use serde_json::json;
//!
//! let document = json!({
//!     "swagger": "2.0",
//!     "paths": {
//!         "/users": {
//!             "get": {
//!                 "parameters": [{"name": "start_time", "in": "query", "type": "string"}],
//!                 "responses": {"200": {"schema": {"$ref": "#/definitions/User"}}}
//!             }
//!         }
//!     },
//!     "definitions": {
//!         "User": {
//!             "type": "object",
//!             "properties": {"created_time": {"type": "string"}}
//!         }
//!     }
//! });
//!
//! let matcher = ScanOptions::default().matcher().unwrap();
//! let report = scan(&document, &matcher).unwrap();
//!
//! let fields: Vec<_> = report.records[0]
//!     .matches
//!     .iter()
//!     .map(|m| (m.location.as_str(), m.field_path.as_str()))
//!     .collect();
//! assert_eq!(
//!     fields,
//!     [("query parameter", "start_time"), ("response(200)", "User.created_time")]
//! );
//! ```
//!
//! # Field paths
//!
//! | Construct | Effect on the path |
//! |-----------|--------------------|
//! | object property | appends `.name` |
//! | `$ref` to a local definition | appends `.DefinitionName` |
//! | array `items` | none |
//! | `allOf` / `oneOf` / `anyOf` member | none |
//!
//! Self-referential schemas terminate: a definition already being expanded on
//! the current descent is not expanded again.

mod dialect;
mod error;
mod loader;
mod matcher;
mod operations;
mod report;
mod scanner;
mod schema;
mod types;
mod walker;

pub use dialect::{detect_dialect, normalize, NormalizedDocument, SchemaStore};
pub use error::{DialectError, LoadError, PatternError, ScanError};
pub use loader::{is_url, load_document, load_document_auto, load_document_str};
pub use matcher::FieldMatcher;
pub use operations::{MediaSchema, Operation, OperationEnumerator, Parameter, ResponseEntry};
pub use report::{render_json, render_markdown, NO_MATCHES};
pub use scanner::{scan, scan_source, ScanReport};
pub use schema::{CompositionKind, SchemaNode};
pub use types::{ApiRecord, Dialect, FieldMatch, HttpMethod, ScanOptions, DEFAULT_PATTERN};
pub use walker::SchemaWalker;

#[cfg(feature = "remote")]
pub use loader::load_document_url;
