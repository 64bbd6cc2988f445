use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Failed to read model artifact '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid model artifact: {0}")]
    Invalid(String),
    #[error("Class index {index} has no label (encoder knows {known} classes)")]
    UnknownClass { index: usize, known: usize },
}

/// Read a JSON artifact, attaching the path to IO failures.
pub(crate) fn read_artifact(path: &std::path::Path) -> Result<String, ModelError> {
    std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.to_path_buf(),
        source,
    })
}
