//! Query operations over a loaded OpenAPI document.
//!
//! [`ApiExplorer`] composes [`ReferenceResolver`] walks into the answers the command-line tool
//! prints: endpoint definitions with their schema dependencies, fully inlined endpoints, schema
//! dependency sets, per-method analyses, listings and search.

use crate::resolver::{ReferenceResolver, ReferenceSet};
use indexmap::IndexMap;
use log::debug;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Amount of detail emitted by the listing operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetailLevel {
    /// Names only
    Basic,
    /// Names with a short annotation
    Medium,
    /// One entry per operation, or full schema bodies
    Detailed,
}

impl From<u8> for DetailLevel {
    fn from(level: u8) -> Self {
        match level {
            0 | 1 => DetailLevel::Basic,
            2 => DetailLevel::Medium,
            _ => DetailLevel::Detailed,
        }
    }
}

/// An endpoint definition together with the schemas it depends on
#[derive(Debug, Clone, Serialize)]
pub struct EndpointDetails {
    pub endpoint: String,
    pub definition: Value,
    pub related_schemas: BTreeMap<String, Value>,
    pub schema_count: usize,
}

/// One endpoint in a prefix query
#[derive(Debug, Clone, Serialize)]
pub struct PrefixEndpoint {
    pub definition: Value,
    /// Names of the schemas this endpoint depends on
    pub related_schemas: ReferenceSet,
    pub schema_count: usize,
}

/// All endpoints under a path prefix, plus the union of their schemas
#[derive(Debug, Clone, Serialize)]
pub struct PrefixMatches {
    pub endpoints: IndexMap<String, PrefixEndpoint>,
    pub all_related_schemas: BTreeMap<String, Value>,
    pub total_endpoints: usize,
    pub total_schemas: usize,
}

/// A component schema together with its transitive dependencies
#[derive(Debug, Clone, Serialize)]
pub struct SchemaDependencies {
    pub schema_name: String,
    pub definition: Value,
    pub dependencies: ReferenceSet,
    pub related_schemas: BTreeMap<String, Value>,
    pub dependency_count: usize,
}

/// Parameter of an operation, with OpenAPI defaults filled in
#[derive(Debug, Clone, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "in")]
    pub location: String,
    pub required: bool,
    pub description: String,
    pub schema: Value,
}

/// Request body of an operation: media type -> schema
#[derive(Debug, Clone, Serialize)]
pub struct RequestBodyInfo {
    pub required: bool,
    pub content: IndexMap<String, Value>,
}

/// Response of an operation: media type -> schema
#[derive(Debug, Clone, Serialize)]
pub struct ResponseInfo {
    pub description: String,
    pub content: IndexMap<String, Value>,
}

/// Analysis of a single HTTP method of an endpoint
#[derive(Debug, Clone, Serialize)]
pub struct MethodAnalysis {
    pub operation_id: String,
    pub description: String,
    pub tags: Value,
    pub parameters: Vec<ParameterInfo>,
    pub request_body: Option<RequestBodyInfo>,
    pub responses: IndexMap<String, ResponseInfo>,
    pub security: Vec<Value>,
    pub schemas_used: ReferenceSet,
}

/// Analysis of every method of an endpoint
#[derive(Debug, Clone, Serialize)]
pub struct EndpointAnalysis {
    pub endpoint: String,
    /// Upper-cased method -> analysis
    pub methods: IndexMap<String, MethodAnalysis>,
    pub all_schemas_used: ReferenceSet,
    pub security_schemes: BTreeSet<String>,
    pub related_schemas: BTreeMap<String, Value>,
    pub schema_count: usize,
}

/// Read-only query facade over a loaded schema document
pub struct ApiExplorer {
    /// The whole document, never mutated after construction
    document: Value,
    /// Resolver over `components.schemas`
    resolver: ReferenceResolver,
}

impl ApiExplorer {
    /// Create an explorer over a parsed document
    pub fn new(document: Value) -> Self {
        let resolver = ReferenceResolver::new(&document);
        debug!(
            "Initializing ApiExplorer with {} paths and {} schemas",
            document
                .get("paths")
                .and_then(Value::as_object)
                .map_or(0, Map::len),
            resolver.schemas().len()
        );
        Self { document, resolver }
    }

    /// The underlying reference resolver
    pub fn resolver(&self) -> &ReferenceResolver {
        &self.resolver
    }

    /// `paths` mapping of the document; empty when absent
    fn paths(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.document
            .get("paths")
            .and_then(Value::as_object)
            .into_iter()
            .flat_map(|paths| paths.iter())
    }

    fn endpoint(&self, endpoint: &str) -> Option<&Value> {
        self.document
            .get("paths")
            .and_then(Value::as_object)
            .and_then(|paths| paths.get(endpoint))
    }

    /// Endpoint definition plus the bodies of every schema it depends on
    pub fn get_complete_endpoint(&self, endpoint: &str) -> Option<EndpointDetails> {
        let definition = self.endpoint(endpoint)?;
        debug!("Collecting schemas for endpoint: {}", endpoint);

        let refs = self.resolver.extract_refs(definition);
        let related_schemas = self.resolver.related_schemas(&refs);

        Some(EndpointDetails {
            endpoint: endpoint.to_string(),
            definition: definition.clone(),
            schema_count: related_schemas.len(),
            related_schemas,
        })
    }

    /// Every endpoint whose path starts with `prefix`, with its schema dependencies
    pub fn get_complete_endpoints_by_prefix(&self, prefix: &str) -> PrefixMatches {
        let mut endpoints = IndexMap::new();
        let mut all_related_schemas = BTreeMap::new();

        for (endpoint, definition) in self.paths() {
            if !endpoint.starts_with(prefix) {
                continue;
            }

            let refs = self.resolver.extract_refs(definition);
            all_related_schemas.extend(self.resolver.related_schemas(&refs));

            endpoints.insert(
                endpoint.clone(),
                PrefixEndpoint {
                    definition: definition.clone(),
                    schema_count: refs.len(),
                    related_schemas: refs,
                },
            );
        }

        debug!("Prefix '{}' matched {} endpoints", prefix, endpoints.len());

        PrefixMatches {
            total_endpoints: endpoints.len(),
            total_schemas: all_related_schemas.len(),
            endpoints,
            all_related_schemas,
        }
    }

    /// Like [`get_complete_endpoint`](Self::get_complete_endpoint), with every `$ref` in the
    /// definition replaced by the referenced body
    pub fn get_endpoint_with_full_schemas(&self, endpoint: &str) -> Option<EndpointDetails> {
        let mut details = self.get_complete_endpoint(endpoint)?;
        details.definition = self.resolver.resolve_all_refs(&details.definition);
        Some(details)
    }

    /// A component schema and the schemas it depends on; `None` for unknown names
    pub fn get_schema_with_dependencies(&self, schema_name: &str) -> Option<SchemaDependencies> {
        let definition = self.resolver.schema(schema_name)?;

        let dependencies = self.resolver.extract_refs(definition);
        let related_schemas = self.resolver.related_schemas(&dependencies);

        Some(SchemaDependencies {
            schema_name: schema_name.to_string(),
            definition: definition.clone(),
            dependency_count: dependencies.len(),
            dependencies,
            related_schemas,
        })
    }

    /// Per-method breakdown of parameters, request body, responses, security and schema usage
    pub fn get_endpoint_analysis(&self, endpoint: &str) -> Option<EndpointAnalysis> {
        let path_item = self.endpoint(endpoint)?.as_object()?;

        let mut methods = IndexMap::new();
        let mut all_schemas_used = ReferenceSet::new();
        let mut security_schemes = BTreeSet::new();

        for (method, operation) in path_item {
            let Some(operation) = operation.as_object() else {
                debug!("Skipping non-operation entry '{}' under {}", method, endpoint);
                continue;
            };

            let analysis = self.analyze_operation(operation);

            for requirement in &analysis.security {
                if let Some(requirement) = requirement.as_object() {
                    security_schemes.extend(requirement.keys().cloned());
                }
            }
            all_schemas_used.extend(analysis.schemas_used.iter().cloned());
            methods.insert(method.to_uppercase(), analysis);
        }

        let related_schemas = self.resolver.related_schemas(&all_schemas_used);

        Some(EndpointAnalysis {
            endpoint: endpoint.to_string(),
            methods,
            all_schemas_used,
            security_schemes,
            schema_count: related_schemas.len(),
            related_schemas,
        })
    }

    fn analyze_operation(&self, operation: &Map<String, Value>) -> MethodAnalysis {
        let mut schemas_used = ReferenceSet::new();

        let parameters: Vec<ParameterInfo> = operation
            .get("parameters")
            .and_then(Value::as_array)
            .map(|params| {
                params
                    .iter()
                    .map(|param| {
                        schemas_used.extend(self.resolver.extract_refs(param));
                        ParameterInfo {
                            name: str_field(param, "name").to_string(),
                            location: str_field(param, "in").to_string(),
                            required: bool_field(param, "required"),
                            description: str_field(param, "description").to_string(),
                            schema: param.get("schema").cloned().unwrap_or_else(empty_object),
                        }
                    })
                    .collect()
            })
            .unwrap_or_default();

        let request_body = operation.get("requestBody").map(|body| RequestBodyInfo {
            required: bool_field(body, "required"),
            content: self.media_schemas(body, &mut schemas_used),
        });

        let responses: IndexMap<String, ResponseInfo> = operation
            .get("responses")
            .and_then(Value::as_object)
            .map(|responses| {
                responses
                    .iter()
                    .map(|(status, response)| {
                        let info = ResponseInfo {
                            description: str_field(response, "description").to_string(),
                            content: self.media_schemas(response, &mut schemas_used),
                        };
                        (status.clone(), info)
                    })
                    .collect()
            })
            .unwrap_or_default();

        MethodAnalysis {
            operation_id: str_field_of(operation, "operationId").to_string(),
            description: str_field_of(operation, "description").to_string(),
            tags: operation
                .get("tags")
                .cloned()
                .unwrap_or_else(|| Value::Array(Vec::new())),
            parameters,
            request_body,
            responses,
            security: operation
                .get("security")
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
            schemas_used,
        }
    }

    /// `content` of a request body or response as media type -> schema, collecting the
    /// schema references of every media type into `schemas_used`
    fn media_schemas(
        &self,
        holder: &Value,
        schemas_used: &mut ReferenceSet,
    ) -> IndexMap<String, Value> {
        holder
            .get("content")
            .and_then(Value::as_object)
            .map(|content| {
                content
                    .iter()
                    .map(|(media_type, media)| {
                        let schema = media.get("schema").cloned().unwrap_or_else(empty_object);
                        schemas_used.extend(self.resolver.extract_refs(&schema));
                        (media_type.clone(), schema)
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Alias of [`get_endpoint_analysis`](Self::get_endpoint_analysis)
    pub fn get_endpoint_summary(&self, endpoint: &str) -> Option<EndpointAnalysis> {
        self.get_endpoint_analysis(endpoint)
    }

    /// List endpoint paths, optionally annotated with their methods
    pub fn list_all_endpoints(&self, level: DetailLevel) -> Vec<String> {
        let mut results = Vec::new();

        for (endpoint, methods) in self.paths() {
            let methods = methods.as_object();
            match level {
                DetailLevel::Basic => results.push(endpoint.clone()),
                DetailLevel::Medium => {
                    let method_list: Vec<&str> = methods
                        .map(|m| m.keys().map(String::as_str).collect())
                        .unwrap_or_default();
                    results.push(format!(
                        "{} [{}]",
                        endpoint,
                        method_list.join(", ").to_uppercase()
                    ));
                }
                DetailLevel::Detailed => {
                    for (method, details) in methods.into_iter().flatten() {
                        results.push(format!(
                            "{} {} - {}: {}",
                            endpoint,
                            method.to_uppercase(),
                            str_field(details, "operationId"),
                            str_field(details, "description")
                        ));
                    }
                }
            }
        }

        results
    }

    /// List component schema names, optionally with their kind or full body
    pub fn list_schema_components(&self, level: DetailLevel) -> Vec<String> {
        self.resolver
            .schemas()
            .iter()
            .map(|(name, schema)| match level {
                DetailLevel::Basic => name.clone(),
                DetailLevel::Medium => format!("{} ({})", name, schema_kind(schema)),
                DetailLevel::Detailed => {
                    let body = serde_json::to_string_pretty(schema)
                        .unwrap_or_else(|_| schema.to_string());
                    format!("{}: {}", name, body)
                }
            })
            .collect()
    }

    /// Case-insensitive search over paths, operation descriptions and operation IDs.
    ///
    /// A path match is reported as the bare path; otherwise the first matching method of the
    /// endpoint is reported as `"<path> (<METHOD>)"`.
    pub fn search_endpoints(&self, query: &str) -> Vec<String> {
        let query = query.to_lowercase();
        let mut results = Vec::new();

        for (endpoint, methods) in self.paths() {
            if endpoint.to_lowercase().contains(&query) {
                results.push(endpoint.clone());
                continue;
            }

            let matching_method = methods.as_object().into_iter().flatten().find(|(_, details)| {
                str_field(details, "description").to_lowercase().contains(&query)
                    || str_field(details, "operationId").to_lowercase().contains(&query)
            });

            if let Some((method, _)) = matching_method {
                results.push(format!("{} ({})", endpoint, method.to_uppercase()));
            }
        }

        debug!("Search '{}' matched {} endpoints", query, results.len());
        results
    }
}

/// `enum`, `object` or the declared `type` of a schema body
fn schema_kind(schema: &Value) -> &str {
    if schema.get("enum").is_some() {
        "enum"
    } else if schema.get("properties").is_some() {
        "object"
    } else {
        str_field(schema, "type")
    }
}

/// String field of a JSON object, `""` when missing or not a string
fn str_field<'a>(value: &'a Value, key: &str) -> &'a str {
    value.get(key).and_then(Value::as_str).unwrap_or("")
}

fn str_field_of<'a>(map: &'a Map<String, Value>, key: &str) -> &'a str {
    map.get(key).and_then(Value::as_str).unwrap_or("")
}

fn bool_field(value: &Value, key: &str) -> bool {
    value.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
