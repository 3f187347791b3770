//! `$ref` resolution over the `components.schemas` section of an OpenAPI document.
//!
//! The resolver offers two walks over arbitrary JSON subtrees:
//!
//! - [`ReferenceResolver::extract_refs`] collects every schema name reachable from the subtree,
//!   following references transitively.
//! - [`ReferenceResolver::resolve_all_refs`] returns a copy of the subtree with every reference
//!   replaced by the body it points to.
//!
//! Neither walk fails: references that point outside `#/components/schemas/` or to unknown
//! names are simply left unresolved.

use log::debug;
use serde_json::{json, Map, Value};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Prefix of every reference the resolver is able to follow
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Marker stored in `_resolved` when inlining stops at a circular reference
pub const CIRCULAR_REFERENCE: &str = "circular_reference";

/// Set of schema names produced by a reference walk
pub type ReferenceSet = BTreeSet<String>;

/// Resolver over the schema index of a loaded document
#[derive(Debug, Clone, Default)]
pub struct ReferenceResolver {
    /// Schema name -> schema body, built once from `components.schemas`
    schemas: Map<String, Value>,
}

impl ReferenceResolver {
    /// Build the schema index from a whole document.
    ///
    /// Missing `components` or `components.schemas` sections yield an empty index.
    pub fn new(document: &Value) -> Self {
        let schemas = document
            .get("components")
            .and_then(|components| components.get("schemas"))
            .and_then(Value::as_object)
            .cloned()
            .unwrap_or_default();

        debug!("Indexed {} component schemas", schemas.len());
        Self::from_schemas(schemas)
    }

    /// Create a resolver over an already extracted schema index
    pub fn from_schemas(schemas: Map<String, Value>) -> Self {
        Self { schemas }
    }

    /// All indexed schemas, in document order
    pub fn schemas(&self) -> &Map<String, Value> {
        &self.schemas
    }

    /// Look up a schema body by bare name
    pub fn schema(&self, name: &str) -> Option<&Value> {
        self.schemas.get(name)
    }

    /// Resolve a reference like `#/components/schemas/Client`.
    ///
    /// Returns `None` when the reference uses another prefix or names an unknown schema.
    pub fn resolve_ref(&self, reference: &str) -> Option<&Value> {
        if !reference.starts_with(SCHEMA_REF_PREFIX) {
            return None;
        }
        self.schemas.get(ref_name(reference))
    }

    /// Collect the names of all schemas reachable from `subtree`, directly or through other
    /// schemas.
    ///
    /// Every referenced name is recorded, resolvable or not. Each in-scope schema body is walked
    /// at most once, so cyclic schema graphs terminate.
    pub fn extract_refs(&self, subtree: &Value) -> ReferenceSet {
        let mut seen = ReferenceSet::new();
        let mut expanded = HashSet::new();
        self.collect_refs(subtree, &mut seen, &mut expanded);
        seen
    }

    fn collect_refs<'a>(
        &'a self,
        node: &'a Value,
        seen: &mut ReferenceSet,
        expanded: &mut HashSet<&'a str>,
    ) {
        match node {
            Value::Object(map) => {
                if let Some(reference) = reference_of(map) {
                    let name = ref_name(reference);
                    seen.insert(name.to_string());
                    if let Some(body) = self.resolve_ref(reference) {
                        if expanded.insert(name) {
                            self.collect_refs(body, seen, expanded);
                        }
                    }
                } else {
                    for value in map.values() {
                        self.collect_refs(value, seen, expanded);
                    }
                }
            }
            Value::Array(items) => {
                for item in items {
                    self.collect_refs(item, seen, expanded);
                }
            }
            _ => {}
        }
    }

    /// Return a copy of `subtree` with every resolvable reference replaced by the referenced
    /// body, recursively.
    ///
    /// A reference met again while its own body is still being expanded is replaced by
    /// `{"$ref": <reference>, "_resolved": "circular_reference"}`. The same schema may be
    /// inlined any number of times in separate branches.
    pub fn resolve_all_refs(&self, subtree: &Value) -> Value {
        let mut in_progress = HashSet::new();
        self.inline_refs(subtree, &mut in_progress)
    }

    fn inline_refs<'a>(&'a self, node: &'a Value, in_progress: &mut HashSet<&'a str>) -> Value {
        match node {
            Value::Object(map) => {
                let Some(reference) = reference_of(map) else {
                    let resolved: Map<String, Value> = map
                        .iter()
                        .map(|(key, value)| (key.clone(), self.inline_refs(value, in_progress)))
                        .collect();
                    return Value::Object(resolved);
                };

                let Some(body) = self.resolve_ref(reference) else {
                    debug!("Leaving unresolved reference: {}", reference);
                    return node.clone();
                };

                let name = ref_name(reference);
                if !in_progress.insert(name) {
                    debug!("Circular reference detected: {}", reference);
                    return json!({ "$ref": reference, "_resolved": CIRCULAR_REFERENCE });
                }

                let expanded = self.inline_refs(body, in_progress);
                in_progress.remove(name);
                expanded
            }
            Value::Array(items) => Value::Array(
                items
                    .iter()
                    .map(|item| self.inline_refs(item, in_progress))
                    .collect(),
            ),
            _ => node.clone(),
        }
    }

    /// Bodies of the named schemas; names missing from the index are dropped
    pub fn related_schemas(&self, names: &ReferenceSet) -> BTreeMap<String, Value> {
        names
            .iter()
            .filter_map(|name| {
                self.schemas
                    .get(name)
                    .map(|body| (name.clone(), body.clone()))
            })
            .collect()
    }
}

/// The `$ref` string of an object, if it has one
fn reference_of(map: &Map<String, Value>) -> Option<&str> {
    map.get("$ref").and_then(Value::as_str)
}

/// Last path segment of a reference: `#/components/schemas/Client` -> `Client`
pub fn ref_name(reference: &str) -> &str {
    reference.rsplit('/').next().unwrap_or(reference)
}
