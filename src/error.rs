use std::path::PathBuf;
use thiserror::Error;

/// Failures that abort a run before any report is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read dataset {path:?}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("dataset {path:?} is not a valid campaign document: {source}")]
    DataFormat {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
