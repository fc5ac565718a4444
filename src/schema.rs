//! Classification of raw schema values.
//!
//! Each schema value is inspected once and broken into the parts the walker
//! handles: a reference, array items, object properties, composition members,
//! or nothing of interest.

use serde_json::{Map, Value};

/// Schema composition keywords, in the order they are visited.
pub const COMPOSITION_KEYWORDS: [CompositionKind; 3] = [
    CompositionKind::AllOf,
    CompositionKind::OneOf,
    CompositionKind::AnyOf,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompositionKind {
    AllOf,
    OneOf,
    AnyOf,
}

impl CompositionKind {
    pub fn keyword(&self) -> &'static str {
        match self {
            CompositionKind::AllOf => "allOf",
            CompositionKind::OneOf => "oneOf",
            CompositionKind::AnyOf => "anyOf",
        }
    }
}

/// One structural part of a schema value.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaNode<'a> {
    /// `$ref`; `None` when the reference is not a string.
    Ref(Option<&'a str>),
    /// Array schema with its `items`.
    Array(&'a Value),
    /// Object schema; `None` when `properties` is missing or not an object.
    Object(Option<&'a Map<String, Value>>),
    /// Composition keyword; `None` when its value is not a list.
    Composite(CompositionKind, Option<&'a [Value]>),
    /// A schema with nothing to descend into.
    Leaf {
        schema_type: String,
        description: &'a str,
    },
    /// Null or not a schema object.
    Invalid,
}

impl<'a> SchemaNode<'a> {
    /// Classify a schema value into the parts the walker visits, in visiting order.
    ///
    /// A `$ref` hides every sibling keyword. Otherwise an array schema with `items`
    /// takes precedence over `properties`; an array without `items` is read as an
    /// object when it has `properties`. Each composition keyword present adds its
    /// own part. Never returns an empty list.
    pub fn classify(value: &'a Value) -> Vec<SchemaNode<'a>> {
        let Value::Object(map) = value else {
            return vec![SchemaNode::Invalid];
        };

        if let Some(reference) = map.get("$ref") {
            return vec![SchemaNode::Ref(reference.as_str())];
        }

        let mut nodes = Vec::new();

        let items = map
            .get("items")
            .filter(|v| !v.is_null() && has_type(map, "array"));
        if let Some(items) = items {
            nodes.push(SchemaNode::Array(items));
        } else if has_type(map, "object") || map.contains_key("properties") {
            nodes.push(SchemaNode::Object(
                map.get("properties").and_then(Value::as_object),
            ));
        }

        for kind in COMPOSITION_KEYWORDS {
            if let Some(members) = map.get(kind.keyword()) {
                nodes.push(SchemaNode::Composite(
                    kind,
                    members.as_array().map(Vec::as_slice),
                ));
            }
        }

        if nodes.is_empty() {
            nodes.push(SchemaNode::Leaf {
                schema_type: field_type(value),
                description: field_description(value),
            });
        }

        nodes
    }
}

/// Declared type of a schema for reporting.
///
/// A type list (OpenAPI 3.1) is joined with `|`; anything else is `unknown`.
pub fn field_type(schema: &Value) -> String {
    match schema.get("type") {
        Some(Value::String(t)) => t.clone(),
        Some(Value::Array(types)) => {
            let names: Vec<&str> = types.iter().filter_map(Value::as_str).collect();
            if names.is_empty() {
                "unknown".to_string()
            } else {
                names.join("|")
            }
        }
        _ => "unknown".to_string(),
    }
}

/// Description of a schema, or an empty string.
pub fn field_description(schema: &Value) -> &str {
    schema
        .get("description")
        .and_then(Value::as_str)
        .unwrap_or_default()
}

fn has_type(map: &Map<String, Value>, name: &str) -> bool {
    match map.get("type") {
        Some(Value::String(t)) => t == name,
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some(name)),
        _ => false,
    }
}
