//! OpenAPI Explorer - Command-line tool for querying an OpenAPI JSON document.
//!
//! # Usage
//!
//! ```bash
//! openapi-explorer [OPTIONS]
//! ```
//!
//! # Examples
//!
//! Show an endpoint together with every schema it depends on:
//! ```bash
//! openapi-explorer --schema-file api_schema.json --endpoint /api/v1/clients/
//! ```
//!
//! Inline every `$ref` of an endpoint, as YAML:
//! ```bash
//! openapi-explorer --resolved /api/v1/clients/ -f yaml
//! ```
//!
//! Enable verbose logging:
//! ```bash
//! openapi-explorer --list-endpoints --level 3 -v
//! ```

use anyhow::Result;
use clap::Parser;
use log::info;
use openapi_explorer::cli;

fn main() -> Result<()> {
    let args = cli::CliArgs::parse();

    // Initialize logger based on verbose flag; RUST_LOG still takes precedence
    let log_level = if args.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    env_logger::Builder::new()
        .filter_level(log_level)
        .parse_default_env()
        .init();

    info!("OpenAPI Explorer starting...");

    cli::run(args)
}
