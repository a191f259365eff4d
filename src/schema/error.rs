//! Schema loading errors

use std::path::PathBuf;
use thiserror::Error;

/// A schema could not be read or parsed. Always fatal for a synthesis run.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("Failed to read schema {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed schema {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Malformed schema JSON: {0}")]
    Json(#[from] serde_json::Error),
}
