//! Error types for godo.
//!
//! `GodoError` covers both the recoverable outcomes a user simply gets told
//! about (usage mistakes, unknown ids, a cancelled edit) and the fatal ones
//! that abort the run (I/O, storage, a corrupted edit document).

use std::process::ExitStatus;

use thiserror::Error;

use crate::document::DocumentError;

/// Error type for every godo operation.
#[derive(Debug, Error)]
pub enum GodoError {
    /// Missing or malformed command-line argument.
    #[error("{0}")]
    Usage(String),

    /// A referenced todo id does not exist.
    #[error("ID does not exist: {0}")]
    NotFound(String),

    /// The edited document had no content, so nothing was stored.
    #[error("Empty content, database not updated")]
    EmptyContent,

    /// The edit document could not be parsed back.
    #[error("Edit document error: {0}")]
    Document(#[from] DocumentError),

    /// File system or process spawn failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// SQLite failure.
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Malformed configuration file.
    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    /// The editor process exited unsuccessfully.
    #[error("Editor `{program}` exited with {status}")]
    Editor { program: String, status: ExitStatus },
}

impl GodoError {
    /// Fatal errors abort with a non-zero exit; the rest are reported and the
    /// process exits cleanly.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            GodoError::Usage(_) | GodoError::NotFound(_) | GodoError::EmptyContent
        )
    }
}

pub type Result<T> = std::result::Result<T, GodoError>;
