use crate::explorer::{ApiExplorer, DetailLevel};
use crate::loader::SchemaLoader;
use crate::serializer::{serialize_json, serialize_yaml, with_title};
use anyhow::Result;
use clap::{CommandFactory, Parser, ValueEnum};
use log::{debug, info};
use serde::Serialize;
use std::path::PathBuf;

const EXAMPLES: &str = "\
Examples:
  # Get all client endpoints with complete schemas
  openapi-explorer --prefix \"/api/v1/clients\"

  # Get specific endpoint with all related schemas
  openapi-explorer --endpoint \"/api/v1/clients/stats/\"

  # Get complete endpoint analysis
  openapi-explorer --analysis \"/api/v1/invoices/{id}/\"

  # Get schema with all dependencies
  openapi-explorer --schema \"AccessLevelEnum\"

  # Get endpoint with fully resolved schemas (no $ref)
  openapi-explorer --resolved \"/api/v1/clients/\"";

/// OpenAPI Explorer - Query endpoints and schemas of an OpenAPI JSON document with complete
/// schema resolution
#[derive(Parser, Debug)]
#[command(name = "openapi-explorer")]
#[command(author, version, about, long_about = None, after_help = EXAMPLES)]
pub struct CliArgs {
    /// Path to the OpenAPI schema JSON file
    #[arg(long = "schema-file", value_name = "FILE", default_value = "api_schema.json")]
    pub schema_file: PathBuf,

    /// Get all endpoints starting with this prefix with complete schemas
    #[arg(long, value_name = "PREFIX")]
    pub prefix: Option<String>,

    /// Get specific endpoint with all related schemas
    #[arg(long, value_name = "PATH")]
    pub endpoint: Option<String>,

    /// Get comprehensive endpoint analysis with all schemas
    #[arg(long, value_name = "PATH")]
    pub analysis: Option<String>,

    /// Get endpoint with fully resolved schemas (no $ref)
    #[arg(long, value_name = "PATH")]
    pub resolved: Option<String>,

    /// Get specific schema component with dependencies
    #[arg(long, value_name = "NAME")]
    pub schema: Option<String>,

    /// Get a summary of an endpoint (alias for --analysis)
    #[arg(long, value_name = "PATH")]
    pub summary: Option<String>,

    /// List all available endpoints
    #[arg(long = "list-endpoints")]
    pub list_endpoints: bool,

    /// List all schema components
    #[arg(long = "list-schemas")]
    pub list_schemas: bool,

    /// Search for endpoints containing this term
    #[arg(long, value_name = "TERM")]
    pub search: Option<String>,

    /// Detail level for listings (1=basic, 2=medium, 3=detailed)
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u8).range(1..=3))]
    pub level: u8,

    /// Output format for structured results (json or yaml)
    #[arg(short = 'f', long = "format", value_enum, default_value = "json")]
    pub output_format: OutputFormat,

    /// Enable verbose output
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// The query selected on the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Query {
    Prefix(String),
    Endpoint(String),
    Analysis(String),
    Resolved(String),
    Schema(String),
    Summary(String),
    ListEndpoints,
    ListSchemas,
    Search(String),
}

impl CliArgs {
    /// The query to run. When several are given, the first in declaration order wins.
    /// Empty string values count as not given.
    pub fn query(&self) -> Option<Query> {
        if let Some(prefix) = non_empty(&self.prefix) {
            Some(Query::Prefix(prefix))
        } else if let Some(endpoint) = non_empty(&self.endpoint) {
            Some(Query::Endpoint(endpoint))
        } else if let Some(endpoint) = non_empty(&self.analysis) {
            Some(Query::Analysis(endpoint))
        } else if let Some(endpoint) = non_empty(&self.resolved) {
            Some(Query::Resolved(endpoint))
        } else if let Some(name) = non_empty(&self.schema) {
            Some(Query::Schema(name))
        } else if let Some(endpoint) = non_empty(&self.summary) {
            Some(Query::Summary(endpoint))
        } else if self.list_endpoints {
            Some(Query::ListEndpoints)
        } else if self.list_schemas {
            Some(Query::ListSchemas)
        } else {
            non_empty(&self.search).map(Query::Search)
        }
    }
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

/// Run the selected query against the schema file and print the result
pub fn run(args: CliArgs) -> Result<()> {
    debug!("Parsed arguments: {:?}", args);

    // A missing or invalid schema file is fatal even when no query is given
    info!("Schema file: {}", args.schema_file.display());
    let document = SchemaLoader::load_file(&args.schema_file)?;
    let explorer = ApiExplorer::new(document);

    let Some(query) = args.query() else {
        CliArgs::command().print_help()?;
        return Ok(());
    };

    info!("Running query: {:?}", query);
    let output = execute(&explorer, &query, args.level, args.output_format)?;
    println!("{}", output);

    Ok(())
}

/// Render the result of `query` as the text printed to stdout
pub fn execute(
    explorer: &ApiExplorer,
    query: &Query,
    level: u8,
    format: OutputFormat,
) -> Result<String> {
    let detail = DetailLevel::from(level);

    let output = match query {
        Query::Prefix(prefix) => {
            let result = explorer.get_complete_endpoints_by_prefix(prefix);
            titled(
                &format!("Complete endpoints starting with '{}'", prefix),
                &result,
                format,
            )?
        }
        Query::Endpoint(endpoint) => match explorer.get_complete_endpoint(endpoint) {
            Some(result) => titled(&format!("Complete endpoint: {}", endpoint), &result, format)?,
            None => endpoint_not_found(endpoint),
        },
        Query::Analysis(endpoint) => match explorer.get_endpoint_analysis(endpoint) {
            Some(result) => titled(&format!("Endpoint analysis: {}", endpoint), &result, format)?,
            None => endpoint_not_found(endpoint),
        },
        Query::Resolved(endpoint) => match explorer.get_endpoint_with_full_schemas(endpoint) {
            Some(result) => titled(
                &format!("Fully resolved endpoint: {}", endpoint),
                &result,
                format,
            )?,
            None => endpoint_not_found(endpoint),
        },
        Query::Schema(name) => match explorer.get_schema_with_dependencies(name) {
            Some(result) => titled(&format!("Schema with dependencies: {}", name), &result, format)?,
            None => format!("Schema component '{}' not found.", name),
        },
        Query::Summary(endpoint) => match explorer.get_endpoint_summary(endpoint) {
            Some(result) => titled(&format!("Endpoint summary: {}", endpoint), &result, format)?,
            None => endpoint_not_found(endpoint),
        },
        Query::ListEndpoints => titled_lines(
            &format!("All Endpoints (Level {})", level),
            &explorer.list_all_endpoints(detail),
        ),
        Query::ListSchemas => titled_lines(
            &format!("All Schema Components (Level {})", level),
            &explorer.list_schema_components(detail),
        ),
        Query::Search(term) => titled_lines(
            &format!("Search Results for '{}'", term),
            &explorer.search_endpoints(term),
        ),
    };

    Ok(output)
}

fn titled<T: Serialize>(title: &str, value: &T, format: OutputFormat) -> Result<String> {
    let content = match format {
        OutputFormat::Json => serialize_json(value)?,
        OutputFormat::Yaml => serialize_yaml(value)?,
    };
    Ok(with_title(title, content.trim_end()))
}

fn titled_lines(title: &str, lines: &[String]) -> String {
    if lines.is_empty() {
        return format!("\n=== {} ===", title);
    }
    with_title(title, &lines.join("\n"))
}

fn endpoint_not_found(endpoint: &str) -> String {
    format!("Endpoint '{}' not found.", endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(args: &[&str]) -> CliArgs {
        let mut argv = vec!["openapi-explorer"];
        argv.extend_from_slice(args);
        CliArgs::try_parse_from(argv).unwrap()
    }

    fn explorer() -> ApiExplorer {
        ApiExplorer::new(json!({
            "paths": {
                "/api/v1/clients/": {
                    "get": { "operationId": "clients_list", "description": "List clients" }
                }
            },
            "components": {
                "schemas": { "Client": { "type": "object", "properties": {} } }
            }
        }))
    }

    #[test]
    fn test_defaults() {
        let args = parse(&[]);
        assert_eq!(args.schema_file, PathBuf::from("api_schema.json"));
        assert_eq!(args.level, 1);
        assert_eq!(args.output_format, OutputFormat::Json);
        assert!(!args.verbose);
        assert_eq!(args.query(), None);
    }

    #[test]
    fn test_level_range_is_validated() {
        let result = CliArgs::try_parse_from(["openapi-explorer", "--list-endpoints", "--level", "4"]);
        assert!(result.is_err());

        let args = parse(&["--list-endpoints", "--level", "3"]);
        assert_eq!(args.level, 3);
    }

    #[test]
    fn test_query_priority() {
        let args = parse(&["--search", "client", "--schema", "Client", "--endpoint", "/x/"]);
        assert_eq!(args.query(), Some(Query::Endpoint("/x/".to_string())));

        let args = parse(&["--list-schemas", "--list-endpoints"]);
        assert_eq!(args.query(), Some(Query::ListEndpoints));

        let args = parse(&["--search", "client", "-f", "yaml"]);
        assert_eq!(args.query(), Some(Query::Search("client".to_string())));
        assert_eq!(args.output_format, OutputFormat::Yaml);
    }

    #[test]
    fn test_empty_values_are_not_queries() {
        let args = parse(&["--prefix", "", "--schema", "Client"]);
        assert_eq!(args.query(), Some(Query::Schema("Client".to_string())));

        let args = parse(&["--prefix", "", "--search", ""]);
        assert_eq!(args.query(), None);
    }

    #[test]
    fn test_run_without_query_still_requires_schema_file() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let missing = temp_dir.path().join("missing.json");
        let args = parse(&["--schema-file", missing.to_str().unwrap()]);

        let err = run(args).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_execute_not_found_messages() {
        let explorer = explorer();

        let output = execute(&explorer, &Query::Endpoint("/nope/".into()), 1, OutputFormat::Json)
            .unwrap();
        assert_eq!(output, "Endpoint '/nope/' not found.");

        let output = execute(&explorer, &Query::Schema("Ghost".into()), 1, OutputFormat::Json)
            .unwrap();
        assert_eq!(output, "Schema component 'Ghost' not found.");
    }

    #[test]
    fn test_execute_structured_output() {
        let output = execute(
            &explorer(),
            &Query::Schema("Client".into()),
            1,
            OutputFormat::Json,
        )
        .unwrap();

        assert!(output.starts_with("\n=== Schema with dependencies: Client ===\n{"));
        assert!(output.contains("\"dependency_count\": 0"));
    }

    #[test]
    fn test_execute_listings() {
        let explorer = explorer();

        let output = execute(&explorer, &Query::ListEndpoints, 2, OutputFormat::Json).unwrap();
        assert_eq!(output, "\n=== All Endpoints (Level 2) ===\n/api/v1/clients/ [GET]");

        let output = execute(&explorer, &Query::ListSchemas, 2, OutputFormat::Yaml).unwrap();
        assert_eq!(output, "\n=== All Schema Components (Level 2) ===\nClient (object)");

        let output = execute(&explorer, &Query::Search("zzz".into()), 1, OutputFormat::Json)
            .unwrap();
        assert_eq!(output, "\n=== Search Results for 'zzz' ===");
    }
}
