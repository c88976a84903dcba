use std::path::PathBuf;

/// Errors from reading or writing model files.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid capture line {line}: {source}")]
    LineError {
        line: usize,
        source: serde_json::Error,
    },

    #[error("Invalid capture: {message}")]
    ValidationError { message: String },
}
