//! Core types shared by the scanner and its collaborators.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::PatternError;
use crate::matcher::FieldMatcher;

/// Pattern used when none is configured.
pub const DEFAULT_PATTERN: &str = "time";

/// Returns the JSON type name for log messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Specification family of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// Swagger 2.0: schemas under `definitions`, base path under `basePath`.
    Swagger2,
    /// OpenAPI 3.x: schemas under `components.schemas`, base URL under `servers`.
    OpenApi3,
}

impl Dialect {
    /// Prefix of local schema references in this dialect.
    pub fn ref_prefix(&self) -> &'static str {
        match self {
            Dialect::Swagger2 => "#/definitions/",
            Dialect::OpenApi3 => "#/components/schemas/",
        }
    }

    /// Human-readable name used in reports.
    pub fn display_name(&self) -> &'static str {
        match self {
            Dialect::Swagger2 => "Swagger 2.0",
            Dialect::OpenApi3 => "OpenAPI 3.x",
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// HTTP methods recognized as operations under a path item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
    Head,
    Options,
}

impl HttpMethod {
    /// Parse a path item key, ignoring case.
    ///
    /// Returns `None` for keys that are not operations (`parameters`, `summary`, `x-*`, ...).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_ascii_lowercase().as_str() {
            "get" => Some(HttpMethod::Get),
            "post" => Some(HttpMethod::Post),
            "put" => Some(HttpMethod::Put),
            "delete" => Some(HttpMethod::Delete),
            "patch" => Some(HttpMethod::Patch),
            "head" => Some(HttpMethod::Head),
            "options" => Some(HttpMethod::Options),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Head => "HEAD",
            HttpMethod::Options => "OPTIONS",
        }
    }
}

impl std::fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A field whose name matched one of the configured patterns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldMatch {
    /// Dotted path from the root of the operation part (e.g. `User.profile.created_time`).
    pub field_path: String,
    /// Declared schema type, or `unknown`.
    pub field_type: String,
    pub description: String,
    /// Where in the operation the field was found (e.g. `query parameter`, `response(200)`).
    pub location: String,
}

/// An operation with at least one matching field.
#[derive(Debug, Clone, Serialize)]
pub struct ApiRecord {
    pub dialect: Dialect,
    pub service_name: String,
    /// Base path or server URL joined with the path template.
    pub path: String,
    pub method: HttpMethod,
    pub description: String,
    pub matches: Vec<FieldMatch>,
}

/// Options for a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanOptions {
    /// Case-insensitive regular expressions, union-matched against every field name.
    #[serde(default = "default_patterns")]
    pub patterns: Vec<String>,
    /// Set while `patterns` holds only the built-in default.
    #[serde(skip)]
    using_default: bool,
}

fn default_patterns() -> Vec<String> {
    vec![DEFAULT_PATTERN.to_string()]
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            patterns: default_patterns(),
            using_default: true,
        }
    }
}

impl ScanOptions {
    /// Create options from a pattern list.
    ///
    /// An empty list falls back to the default pattern.
    pub fn new<I, S>(patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().patterns(patterns)
    }

    /// Add a pattern. The first call replaces the default.
    pub fn pattern(mut self, pattern: impl Into<String>) -> Self {
        if self.using_default {
            self.patterns.clear();
            self.using_default = false;
        }
        self.patterns.push(pattern.into());
        self
    }

    /// Add several patterns, as if by repeated [`ScanOptions::pattern`] calls.
    pub fn patterns<I, S>(self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        patterns.into_iter().fold(self, |opts, p| opts.pattern(p))
    }

    /// Compile the configured patterns.
    ///
    /// # Errors
    ///
    /// Returns `PatternError::InvalidPattern` for the first pattern that is not a valid regex.
    pub fn matcher(&self) -> Result<FieldMatcher, PatternError> {
        FieldMatcher::new(&self.patterns)
    }
}
