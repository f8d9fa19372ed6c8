use std::path::PathBuf;

use thiserror::Error;

/// Failures a single store operation can produce.
///
/// The `Display` text of each variant is what a client sees as the reply
/// body, except for [`StoreError::Io`], which is logged and replaced by a
/// generic reply so disk paths never leak onto the wire.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid index")]
    InvalidIndex,

    #[error("file is empty")]
    EmptyStore,

    #[error("malformed command: {0}")]
    MalformedCommand(String),

    #[error("I/O error while {operation} at {path}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    pub(crate) fn io(
        operation: &'static str,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = StoreError> = std::result::Result<T, E>;
