use std::path::PathBuf;

use thiserror::Error;

/// Failure reasons carried by [`crate::Outcome::Failure`].
///
/// The `Display` output is the user-facing diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("file does not exist - {}", path.display())]
    PathNotFound { path: PathBuf },

    #[error("path is not a file - {}", path.display())]
    NotAFile { path: PathBuf },

    #[error("not a valid PDF file - {name}")]
    InvalidExtension { name: String },

    #[error("incorrect password, cannot open file")]
    WrongPassword,

    #[error("file is corrupted or malformed - {name}")]
    CorruptedFile { name: String },

    #[error("document has no readable pages - {name}")]
    NoPages { name: String },

    /// Anything the backend raised that could not be classified.
    #[error("{0}")]
    Library(String),
}

/// Errors raised by a [`crate::PdfBackend`]. Only the message text is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    #[error("{0}")]
    Open(String),

    #[error("{0}")]
    Extract(String),

    #[error("password required to open encrypted document")]
    PasswordRequired,
}

impl BackendError {
    pub fn message(&self) -> &str {
        match self {
            BackendError::Open(msg) | BackendError::Extract(msg) => msg,
            BackendError::PasswordRequired => "password required to open encrypted document",
        }
    }
}

impl From<lopdf::Error> for BackendError {
    fn from(e: lopdf::Error) -> Self {
        BackendError::Open(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to write report to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to console: {0}")]
    Console(#[from] std::io::Error),
}
