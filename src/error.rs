use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid glob pattern: {0}")]
    Glob(#[from] globset::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{kind} not found: {name}")]
    NotFound { kind: &'static str, name: String },

    #[error("data directory could not be determined: {0}")]
    DataDir(PathBuf),

    #[error("catalog unavailable at {path}: {reason}")]
    CatalogUnavailable { path: PathBuf, reason: String },

    #[error("document not found: {0}")]
    DocumentNotFound(String),

    #[error("document is corrupt: {locator}: {reason}")]
    DocumentCorrupt { locator: String, reason: String },

    #[error("invalid document: reported page count {0}")]
    InvalidDocument(i64),

    #[error("no document is open")]
    NoActiveDocument,

    #[error("'{0}' is not in the current results")]
    NotInResults(String),
}
