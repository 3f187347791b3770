use crate::error::{Error, Result};
use log::debug;
use serde_json::Value;
use std::fs;
use std::io;
use std::path::Path;

/// Loader for OpenAPI schema documents stored as JSON.
///
/// The loader is the only place where the tool touches the filesystem. It hands back an
/// already-parsed [`serde_json::Value`]; everything downstream works on that value and never
/// sees a partially loaded document.
///
/// # Example
///
/// ```no_run
/// use openapi_explorer::loader::SchemaLoader;
/// use std::path::Path;
///
/// let document = SchemaLoader::load_file(Path::new("api_schema.json")).unwrap();
/// println!("Loaded {} paths", document["paths"].as_object().map_or(0, |p| p.len()));
/// ```
pub struct SchemaLoader;

impl SchemaLoader {
    /// Reads and parses a schema file.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The file does not exist ([`Error::SchemaNotFound`])
    /// - The file cannot be read ([`Error::Io`])
    /// - The content is not valid JSON ([`Error::InvalidJson`])
    pub fn load_file(path: &Path) -> Result<Value> {
        debug!("Loading schema file: {}", path.display());

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(Error::SchemaNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(e.into()),
        };

        Self::parse_str(&content, path)
    }

    /// Parses schema content that was read from `origin`.
    ///
    /// `origin` is only used to label the error when the content is not valid JSON.
    pub fn parse_str(content: &str, origin: &Path) -> Result<Value> {
        let document: Value = serde_json::from_str(content).map_err(|e| Error::InvalidJson {
            file: origin.to_path_buf(),
            message: e.to_string(),
        })?;

        debug!("Parsed {} bytes from {}", content.len(), origin.display());
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn test_load_valid_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("api_schema.json");
        let mut file = fs::File::create(&file_path).unwrap();
        file.write_all(br#"{"paths": {"/health/": {"get": {}}}}"#).unwrap();

        let document = SchemaLoader::load_file(&file_path).unwrap();
        assert!(document["paths"]["/health/"]["get"].is_object());
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("missing.json");

        let result = SchemaLoader::load_file(&file_path);

        match result {
            Err(Error::SchemaNotFound(path)) => assert_eq!(path, file_path),
            other => panic!("Expected SchemaNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_load_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("broken.json");
        fs::write(&file_path, "{ \"paths\": ").unwrap();

        let result = SchemaLoader::load_file(&file_path);

        match result {
            Err(Error::InvalidJson { file, message }) => {
                assert_eq!(file, file_path);
                assert!(!message.is_empty());
            }
            other => panic!("Expected InvalidJson, got {:?}", other),
        }
    }

    #[test]
    fn test_error_messages() {
        let not_found = Error::SchemaNotFound("api_schema.json".into());
        assert_eq!(not_found.to_string(), "Schema file 'api_schema.json' not found.");

        let err = SchemaLoader::parse_str("not json", Path::new("inline.json")).unwrap_err();
        assert!(err.to_string().starts_with("Invalid JSON in schema file inline.json:"));
    }

    #[test]
    fn test_parse_preserves_key_order() {
        let document =
            SchemaLoader::parse_str(r#"{"b": 1, "a": 2, "c": 3}"#, Path::new("x.json")).unwrap();
        let keys: Vec<_> = document.as_object().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
