//! Error types for loading field metadata

use std::path::PathBuf;
use thiserror::Error;

/// Result type for fieldgroups operations
pub type Result<T> = std::result::Result<T, FieldsError>;

/// Errors that can occur while loading field metadata.
///
/// Classification itself never fails; only turning raw input into
/// descriptors can.
#[derive(Debug, Error)]
pub enum FieldsError {
    /// Input file could not be read
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Input does not match the descriptor shape, or is not valid JSON
    #[error("invalid field metadata: {0}")]
    Json(#[from] serde_json::Error),

    /// Input is not valid YAML
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),
}
