//! Error types for document generation and injection.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// Errors that can occur while generating or augmenting a document.
#[derive(Debug, Error)]
pub enum Error {
    /// Unrecognized document format selector.
    #[error("Unknown document format '{0}' (expected v2 or v3)")]
    UnknownFormat(String),

    /// The project file could not be read.
    #[error("Failed to read project file {}: {source}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The project file is not valid TOML or has the wrong shape.
    #[error("Invalid project file {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: Box<toml::de::Error>,
    },

    /// An API named on the command line is not in the project file.
    #[error("No API named '{0}' in the project file")]
    UnknownApi(String),

    /// The generator process could not be started.
    #[error("Failed to start generator '{program}': {source}")]
    GeneratorSpawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The generator process exited unsuccessfully.
    #[error("Generator failed for '{api}' ({status})")]
    GeneratorFailed { api: String, status: ExitStatus },

    /// The generated document could not be read.
    #[error("Failed to read document {}: {source}", path.display())]
    DocumentRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generated document is not valid JSON.
    #[error("Failed to parse document {}: {source}", path.display())]
    DocumentParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The augmented document could not be written back.
    #[error("Failed to write document {}: {source}", path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document parsed but does not have the expected structure.
    #[error("Malformed document: {message}")]
    MalformedDocument { message: String },
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Error::MalformedDocument {
            message: message.into(),
        }
    }
}
