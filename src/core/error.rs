//! Error types for snapshot building and the embedded runtime

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("Failed to read source path {path}: {source}")]
    SourceRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed to list source directory {path}: {source}")]
    SourceWalk {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("Compression failed: {0}")]
    Compression(String),

    #[error("File does not exist: {0}")]
    NotFound(String),

    #[error("Unsupported operation {op} on {path}")]
    Unsupported { op: &'static str, path: String },

    #[error("Handle for {0} is closed")]
    Closed(String),

    #[error("No more entries in directory {0}")]
    EndOfDirectory(String),

    #[error("Embedded content for {path} is corrupted: {reason}")]
    Corrupted { path: String, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Binary serialization error: {0}")]
    Bincode(#[from] bincode::Error),
}

impl EmbedError {
    pub(crate) fn source_read(path: &str, source: io::Error) -> Self {
        EmbedError::SourceRead {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn source_walk(path: &str, source: io::Error) -> Self {
        EmbedError::SourceWalk {
            path: path.to_string(),
            source,
        }
    }

    pub(crate) fn unsupported(op: &'static str, path: &str) -> Self {
        EmbedError::Unsupported {
            op,
            path: path.to_string(),
        }
    }

    /// Check if this error reports a missing path
    pub fn is_not_found(&self) -> bool {
        matches!(self, EmbedError::NotFound(_))
    }
}

impl From<EmbedError> for io::Error {
    fn from(err: EmbedError) -> Self {
        let kind = match &err {
            EmbedError::NotFound(_) => io::ErrorKind::NotFound,
            EmbedError::Unsupported { .. } => io::ErrorKind::Unsupported,
            EmbedError::Corrupted { .. } => io::ErrorKind::InvalidData,
            EmbedError::Io(e) => e.kind(),
            _ => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

pub type Result<T> = std::result::Result<T, EmbedError>;
