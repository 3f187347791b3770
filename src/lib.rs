//! OpenAPI Explorer - query tool for static OpenAPI JSON documents.
//!
//! This library loads an OpenAPI document once and answers read-only questions about it:
//! which schemas an endpoint depends on, what an endpoint looks like with every `$ref`
//! inlined, which schemas a component depends on, and simple listing and search over paths.
//!
//! # Architecture
//!
//! 1. [`loader`] - Reads and parses the schema file
//! 2. [`resolver`] - Extracts and inlines `#/components/schemas/` references, with cycle guards
//! 3. [`explorer`] - Composes resolver walks into endpoint and schema queries
//! 4. [`serializer`] - Renders query results as JSON or YAML
//!
//! # Example Usage
//!
//! ```no_run
//! use openapi_explorer::{explorer::ApiExplorer, loader::SchemaLoader, serializer::serialize_json};
//! use std::path::Path;
//!
//! let document = SchemaLoader::load_file(Path::new("api_schema.json")).unwrap();
//! let explorer = ApiExplorer::new(document);
//!
//! if let Some(endpoint) = explorer.get_complete_endpoint("/api/v1/clients/") {
//!     println!("{}", serialize_json(&endpoint).unwrap());
//! }
//! ```
//!
//! # Command-Line Interface
//!
//! For command-line usage, see the [`cli`] module.

pub mod cli;
pub mod error;
pub mod explorer;
pub mod loader;
pub mod resolver;
pub mod serializer;
