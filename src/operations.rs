//! Operation extraction from normalized documents.
//!
//! Turns the `paths` object into [`Operation`]s whose request and response
//! parts are flat lists of media-type schemas, so the scanner handles both
//! dialects the same way.

use serde_json::{Map, Value};
use tracing::trace;

use crate::dialect::NormalizedDocument;
use crate::schema::field_type;
use crate::types::{Dialect, HttpMethod};

/// A single operation parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter<'a> {
    pub name: String,
    /// The `in` value: `query`, `path`, `header`, `body`, `formData`, `cookie`.
    pub location: String,
    /// Inline `type` (Swagger 2.0) or `schema.type` (OpenAPI 3.x).
    pub param_type: String,
    pub description: String,
    pub schema: Option<&'a Value>,
}

/// A schema attached to a media type (request body or response content).
#[derive(Debug, Clone, PartialEq)]
pub struct MediaSchema<'a> {
    /// `None` for Swagger 2.0 responses, which carry one schema without a media type.
    pub media_type: Option<String>,
    pub schema: &'a Value,
}

/// Response schemas for one status code.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEntry<'a> {
    pub status_code: String,
    pub content: Vec<MediaSchema<'a>>,
}

/// An API operation extracted from a document.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation<'a> {
    pub service_name: String,
    /// Base URL joined with the path template.
    pub path: String,
    pub method: HttpMethod,
    /// `summary`, else `description`, else empty.
    pub description: String,
    pub parameters: Vec<Parameter<'a>>,
    /// Request body content, OpenAPI 3.x only.
    pub request_body: Option<Vec<MediaSchema<'a>>>,
    pub responses: Vec<ResponseEntry<'a>>,
}

/// Extracts operations from a normalized document.
pub struct OperationEnumerator;

impl OperationEnumerator {
    /// Extract every operation in path order, then method order, as declared.
    pub fn extract<'a>(document: &NormalizedDocument<'a>) -> Vec<Operation<'a>> {
        let Some(paths) = document.paths else {
            return Vec::new();
        };

        let mut operations = Vec::new();
        for (path, path_item) in paths {
            let Some(path_item) = path_item.as_object() else {
                trace!(path = %path, "skipping non-object path item");
                continue;
            };

            for (key, operation) in path_item {
                let Some(method) = HttpMethod::from_key(key) else {
                    continue;
                };
                let Some(operation) = operation.as_object() else {
                    trace!(path = %path, method = %method, "skipping non-object operation");
                    continue;
                };

                operations.push(Self::extract_operation(
                    document,
                    format!("{}{}", document.base_url, path),
                    method,
                    operation,
                ));
            }
        }

        operations
    }

    fn extract_operation<'a>(
        document: &NormalizedDocument<'a>,
        path: String,
        method: HttpMethod,
        operation: &'a Map<String, Value>,
    ) -> Operation<'a> {
        let description = operation
            .get("summary")
            .and_then(Value::as_str)
            .or_else(|| operation.get("description").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string();

        let parameters = operation
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .filter_map(|p| Self::convert_parameter(document.dialect, p))
                    .collect()
            })
            .unwrap_or_default();

        let request_body = match document.dialect {
            Dialect::Swagger2 => None,
            Dialect::OpenApi3 => operation.get("requestBody").map(content_schemas),
        };

        let responses = operation
            .get("responses")
            .and_then(Value::as_object)
            .map(|responses| Self::extract_responses(document.dialect, responses))
            .unwrap_or_default();

        Operation {
            service_name: document.service_name.clone(),
            path,
            method,
            description,
            parameters,
            request_body,
            responses,
        }
    }

    fn convert_parameter(dialect: Dialect, param: &Value) -> Option<Parameter<'_>> {
        let param = param.as_object()?;
        let text = |key: &str| {
            param
                .get(key)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let schema = param.get("schema");

        let param_type = match dialect {
            Dialect::Swagger2 => text("type"),
            Dialect::OpenApi3 => schema.map_or_else(|| "unknown".to_string(), field_type),
        };

        Some(Parameter {
            name: text("name"),
            location: text("in"),
            param_type,
            description: text("description"),
            schema,
        })
    }

    fn extract_responses<'a>(
        dialect: Dialect,
        responses: &'a Map<String, Value>,
    ) -> Vec<ResponseEntry<'a>> {
        responses
            .iter()
            .filter_map(|(status, response)| {
                let content = match dialect {
                    Dialect::Swagger2 => response
                        .get("schema")
                        .map(|schema| {
                            vec![MediaSchema {
                                media_type: None,
                                schema,
                            }]
                        })
                        .unwrap_or_default(),
                    Dialect::OpenApi3 => content_schemas(response),
                };

                (!content.is_empty()).then(|| ResponseEntry {
                    status_code: status.clone(),
                    content,
                })
            })
            .collect()
    }
}

/// Schemas under an OpenAPI 3.x `content` map, one per media type that declares one.
fn content_schemas(holder: &Value) -> Vec<MediaSchema<'_>> {
    let Some(content) = holder.get("content").and_then(Value::as_object) else {
        return Vec::new();
    };

    content
        .iter()
        .filter_map(|(media_type, media)| {
            media.get("schema").map(|schema| MediaSchema {
                media_type: Some(media_type.clone()),
                schema,
            })
        })
        .collect()
}
