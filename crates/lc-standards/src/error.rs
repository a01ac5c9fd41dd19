#![deny(unsafe_code)]

use std::path::PathBuf;

use lc_model::{FormatError, ModelError};

#[derive(Debug, thiserror::Error)]
pub enum StandardsError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML manifest {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid manifest: {message}")]
    InvalidManifest { message: String },

    #[error("missing required role in manifest: {role}")]
    MissingRole { role: String },

    #[error("duplicate role in manifest: {role}")]
    DuplicateRole { role: String },

    #[error("invalid sha256 for {path}: {message}")]
    InvalidSha256 { path: PathBuf, message: String },

    #[error("invalid manifest path {path}: {message}")]
    InvalidPath { path: PathBuf, message: String },

    #[error("missing file listed in manifest: {path}")]
    MissingFile { path: PathBuf },

    #[error("unexpected file present under standards/: {path}")]
    UnexpectedFile { path: PathBuf },

    #[error("sha256 mismatch for {path} (expected {expected}, got {actual})")]
    Sha256Mismatch {
        path: PathBuf,
        expected: String,
        actual: String,
    },

    #[error("failed to parse CSV {path}: {message}")]
    Csv { path: PathBuf, message: String },

    #[error("{path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: ModelError,
    },

    #[error("MT{message_type} field {tag}: {source}")]
    Format {
        message_type: String,
        tag: String,
        #[source]
        source: FormatError,
    },

    #[error("MT{message_type} defines tag {tag} more than once")]
    DuplicateTag { message_type: String, tag: String },

    #[error("MT{message_type} uses sequence {sequence} for both {first} and {second}")]
    DuplicateSequence {
        message_type: String,
        sequence: u32,
        first: String,
        second: String,
    },

    #[error("{path}: unknown message type MT{message_type}")]
    UndefinedMessageType { path: PathBuf, message_type: String },

    #[error("{path}: MT{message_type} has no field {tag}")]
    UndefinedField {
        path: PathBuf,
        message_type: String,
        tag: String,
    },

    #[error("unknown message type: MT{message_type}")]
    UnknownMessageType { message_type: String },
}

impl StandardsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn csv(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Csv {
            path: path.into(),
            message: message.into(),
        }
    }
}
