use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unknown rule kind: {0}")]
    UnknownRuleKind(String),
    #[error("invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
    #[error("unknown severity: {0}")]
    UnknownSeverity(String),
    #[error("unknown document type: {0}")]
    UnknownDocumentType(String),
    #[error("unknown field category: {0}")]
    UnknownCategory(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
