//! Field discovery over schema trees.
//!
//! The walker follows local `$ref`s, array items, object properties and
//! `allOf`/`oneOf`/`anyOf` members, reporting every property whose name matches.
//!
//! Traversal uses an explicit work stack instead of native recursion, so deeply
//! nested documents cannot exhaust the thread stack. Steps are pushed in reverse
//! so matches come out in declaration order.
//!
//! # Cycles
//!
//! The set of definitions currently being expanded is scoped to one [`SchemaWalker::walk`]
//! call. A `$ref` to a definition already in the set contributes nothing; the
//! matches found on the way down were already emitted. The same definition
//! reached through two different paths is expanded twice, yielding two field paths.
//!
//! # Malformed input
//!
//! Anything that is not a recognizable schema contributes no matches. The walker
//! never fails.

use std::collections::HashSet;

use serde_json::{Map, Value};
use tracing::trace;

use crate::dialect::SchemaStore;
use crate::matcher::FieldMatcher;
use crate::schema::{field_description, field_type, SchemaNode};
use crate::types::{json_type_name, FieldMatch};

/// Walks schemas of one document against one matcher.
#[derive(Debug, Clone, Copy)]
pub struct SchemaWalker<'a> {
    store: SchemaStore<'a>,
    matcher: &'a FieldMatcher,
}

enum Step<'a> {
    /// Expand a schema value with the given dotted parent path.
    Visit { node: &'a Value, path: String },
    Emit(FieldMatch),
    /// Leave a `$ref` expansion.
    Release(String),
}

impl<'a> SchemaWalker<'a> {
    pub fn new(store: SchemaStore<'a>, matcher: &'a FieldMatcher) -> Self {
        Self { store, matcher }
    }

    /// Whether a bare name (such as a parameter name) matches.
    pub fn matches_name(&self, name: &str) -> bool {
        self.matcher.matches(name)
    }

    /// Collect matches under `root`, tagging each with `location`.
    ///
    /// Field paths are built from `parent_path` (empty for a bare body or response).
    pub fn walk(&self, root: &'a Value, location: &str, parent_path: &str) -> Vec<FieldMatch> {
        let mut matches = Vec::new();
        let mut expanding: HashSet<String> = HashSet::new();
        let mut stack = vec![Step::Visit {
            node: root,
            path: parent_path.to_string(),
        }];

        while let Some(step) = stack.pop() {
            match step {
                Step::Visit { node, path } => {
                    let steps = self.expand(node, &path, location, &mut expanding);
                    stack.extend(steps.into_iter().rev());
                }
                Step::Emit(field) => matches.push(field),
                Step::Release(name) => {
                    expanding.remove(&name);
                }
            }
        }

        matches
    }

    /// Steps for one schema value, in output order.
    fn expand(
        &self,
        node: &'a Value,
        path: &str,
        location: &str,
        expanding: &mut HashSet<String>,
    ) -> Vec<Step<'a>> {
        let mut steps = Vec::new();

        for part in SchemaNode::classify(node) {
            match part {
                SchemaNode::Ref(reference) => {
                    self.expand_ref(reference, path, expanding, &mut steps);
                }
                SchemaNode::Array(items) => steps.push(Step::Visit {
                    node: items,
                    path: path.to_string(),
                }),
                SchemaNode::Object(Some(properties)) => {
                    self.expand_properties(properties, path, location, &mut steps);
                }
                SchemaNode::Composite(kind, Some(members)) => {
                    trace!(keyword = kind.keyword(), members = members.len(), path, "composition");
                    steps.extend(members.iter().filter(|m| !m.is_null()).map(|member| {
                        Step::Visit {
                            node: member,
                            path: path.to_string(),
                        }
                    }));
                }
                SchemaNode::Invalid => {
                    trace!(found = json_type_name(node), path, "not a schema");
                }
                SchemaNode::Object(None)
                | SchemaNode::Composite(_, None)
                | SchemaNode::Leaf { .. } => {}
            }
        }

        steps
    }

    fn expand_ref(
        &self,
        reference: Option<&str>,
        path: &str,
        expanding: &mut HashSet<String>,
        steps: &mut Vec<Step<'a>>,
    ) {
        let Some(reference) = reference else {
            return;
        };
        let Some(name) = self.store.ref_name(reference) else {
            trace!(reference, "unresolvable reference");
            return;
        };
        if expanding.contains(&*name) {
            trace!(reference, path, "reference cycle");
            return;
        }
        let Some(target) = self.store.get(&name) else {
            trace!(reference, "reference to missing definition");
            return;
        };

        let name = name.into_owned();
        expanding.insert(name.clone());
        steps.push(Step::Visit {
            node: target,
            path: join_path(path, &name),
        });
        steps.push(Step::Release(name));
    }

    fn expand_properties(
        &self,
        properties: &'a Map<String, Value>,
        path: &str,
        location: &str,
        steps: &mut Vec<Step<'a>>,
    ) {
        for (name, schema) in properties {
            let child_path = join_path(path, name);

            if self.matcher.matches(name) {
                steps.push(Step::Emit(FieldMatch {
                    field_path: child_path.clone(),
                    field_type: field_type(schema),
                    description: field_description(schema).to_string(),
                    location: location.to_string(),
                }));
            }

            steps.push(Step::Visit {
                node: schema,
                path: child_path,
            });
        }
    }
}

/// `parent.child`, or `child` at the root.
pub fn join_path(parent: &str, child: &str) -> String {
    if parent.is_empty() {
        child.to_string()
    } else {
        format!("{}.{}", parent, child)
    }
}
