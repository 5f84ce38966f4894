use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HailgenError {
    #[error("Avro prefix must not be empty")]
    EmptyPrefix,

    #[error("Path does not start with prefix '{prefix}': {path}")]
    PrefixMismatch { prefix: String, path: String },

    #[error("Path has too few segments for its category: {path}")]
    MissingSegments { path: String },

    #[error("Malformed superpartition directory '{segment}' in path: {path}")]
    MalformedSuperpartition { path: String, segment: String },

    #[error("Superpartition index {index} missing for key '{key}' - listing is incomplete")]
    SuperpartitionGap { key: String, index: usize },

    #[error("Failed to read listing file {path}: {source}")]
    ListingRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Unknown config key: {key}")]
    ConfigKeyNotFound { key: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HailgenError>;

impl HailgenError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::PrefixMismatch { .. } => 2,
            Self::MissingSegments { .. } => 3,
            Self::MalformedSuperpartition { .. } => 4,
            Self::SuperpartitionGap { .. } => 5,
            Self::ListingRead { .. } => 6,
            Self::ConfigKeyNotFound { .. } => 7,
            _ => 1,
        }
    }
}
