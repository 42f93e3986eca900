// Error types for tagfold
//
// Decode errors are recovered per file by the aggregator; export errors
// abort the run.

use std::path::PathBuf;

use thiserror::Error;

/// A file's tags could not be read
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container recognised but its tag layout is not one we read
    #[error("Unsupported tag format: {0}")]
    Unsupported(String),

    #[error("Malformed tag data: {0}")]
    Malformed(String),

    /// A single ID3v2 frame could not be rendered to text
    #[error("Cannot render frame {frame}: {reason}")]
    FrameRender { frame: String, reason: String },
}

impl DecodeError {
    pub(crate) fn render(frame: &str, reason: impl Into<String>) -> Self {
        DecodeError::FrameRender {
            frame: frame.to_string(),
            reason: reason.into(),
        }
    }
}

/// Writing an export failed
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Connection, schema, insert or commit failure; the transaction is rolled back
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}

/// Errors surfaced by [`crate::parse_library`]
#[derive(Error, Debug)]
pub enum Error {
    #[error("Cannot enumerate {path}: {reason}")]
    Enumerate { path: PathBuf, reason: String },

    #[error(transparent)]
    Export(#[from] ExportError),
}

pub type Result<T> = std::result::Result<T, Error>;
