use std::path::PathBuf;

/// Result type alias for schema loading
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while loading the schema document
#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    SchemaNotFound(PathBuf),
    InvalidJson { file: PathBuf, message: String },
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Io(e) => write!(f, "IO error: {}", e),
            Error::SchemaNotFound(file) => {
                write!(f, "Schema file '{}' not found.", file.display())
            }
            Error::InvalidJson { file, message } => {
                write!(f, "Invalid JSON in schema file {}: {}", file.display(), message)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}
