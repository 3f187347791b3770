//! Serialization of query results to JSON or YAML text.
//!
//! Every facade result is a plain `Serialize` value; this module is the only place where such
//! values become text.

use anyhow::{Context, Result};
use log::debug;
use serde::Serialize;

/// Serializes a query result to JSON with pretty printing.
///
/// Output uses two-space indentation and keeps non-ASCII characters as-is.
///
/// # Errors
///
/// Returns an error if serialization fails.
///
/// # Example
///
/// ```
/// use openapi_explorer::serializer::serialize_json;
/// use serde_json::json;
///
/// let json = serialize_json(&json!({ "schema_count": 2 })).unwrap();
/// assert_eq!(json, "{\n  \"schema_count\": 2\n}");
/// ```
pub fn serialize_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    debug!("Serializing result to JSON");
    serde_json::to_string_pretty(value).context("Failed to serialize result to JSON")
}

/// Serializes a query result to YAML.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn serialize_yaml<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    debug!("Serializing result to YAML");
    serde_yaml::to_string(value).context("Failed to serialize result to YAML")
}

/// Prefixes serialized content with a `=== title ===` header line
pub fn with_title(title: &str, content: &str) -> String {
    format!("\n=== {} ===\n{}", title, content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::explorer::ApiExplorer;
    use serde_json::json;

    fn create_test_explorer() -> ApiExplorer {
        ApiExplorer::new(json!({
            "paths": {
                "/api/v1/clients/": {
                    "post": {
                        "operationId": "clients_create",
                        "requestBody": {
                            "content": {
                                "application/json": {
                                    "schema": { "$ref": "#/components/schemas/ClientCreate" }
                                }
                            }
                        }
                    }
                }
            },
            "components": {
                "schemas": {
                    "ClientCreate": {
                        "type": "object",
                        "properties": { "name": { "type": "string", "description": "Société" } }
                    }
                }
            }
        }))
    }

    #[test]
    fn test_serialize_json() {
        let details = create_test_explorer()
            .get_complete_endpoint("/api/v1/clients/")
            .unwrap();
        let json = serialize_json(&details).unwrap();

        assert!(json.contains("\"endpoint\": \"/api/v1/clients/\""));
        assert!(json.contains("\"schema_count\": 1"));
        assert!(json.contains("\"ClientCreate\""));

        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["related_schemas"]["ClientCreate"]["type"], "object");
    }

    #[test]
    fn test_serialize_json_keeps_unicode() {
        let details = create_test_explorer()
            .get_schema_with_dependencies("ClientCreate")
            .unwrap();
        let json = serialize_json(&details).unwrap();

        assert!(json.contains("Société"));
    }

    #[test]
    fn test_serialize_json_pretty_format() {
        let json = serialize_json(&json!({ "a": { "b": 1 } })).unwrap();

        assert!(json.contains('\n'));
        assert!(json.contains("    \"b\": 1"));
    }

    #[test]
    fn test_serialize_json_string_list() {
        let json = serialize_json(&vec!["/a/", "/b/"]).unwrap();
        assert_eq!(json, "[\n  \"/a/\",\n  \"/b/\"\n]");
    }

    #[test]
    fn test_serialize_yaml() {
        let analysis = create_test_explorer()
            .get_endpoint_analysis("/api/v1/clients/")
            .unwrap();
        let yaml = serialize_yaml(&analysis).unwrap();

        assert!(yaml.contains("endpoint: /api/v1/clients/"));
        assert!(yaml.contains("POST:"));
        assert!(yaml.contains("operation_id: clients_create"));
        assert!(yaml.contains("request_body:"));

        let parsed: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed["schema_count"].as_u64(), Some(1));
    }

    #[test]
    fn test_with_title() {
        assert_eq!(with_title("Search Results", "[]"), "\n=== Search Results ===\n[]");
    }
}
