use std::path::PathBuf;

use thiserror::Error;

/// Failure to turn input bytes into an [`Interface`](crate::model::Interface).
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// `path` is the JSON path of the offending node, e.g. `functions[2].message_type`.
    #[error("at JSON path {path} → {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON pointer `{0}` selects nothing")]
    PointerNotFound(String),
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error("jq filter failed:\n{0}")]
    Jq(String),
    #[error("jq output is not valid JSON: {0}")]
    JqOutput(#[source] serde_json::Error),
    #[error("bad input pattern: {0}")]
    Glob(String),
    #[error("{count} validation error(s)")]
    Validation { count: usize },
}

pub type Result<T, E = ModelError> = std::result::Result<T, E>;
