use lc_model::FormatError;
use lc_standards::StandardsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    #[error("unknown message type: MT{message_type}")]
    UnknownMessageType { message_type: String },

    #[error("field {tag} has an invalid format: {source}")]
    Format {
        tag: String,
        #[source]
        source: FormatError,
    },

    #[error(transparent)]
    Standards(StandardsError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl From<StandardsError> for ValidateError {
    fn from(error: StandardsError) -> Self {
        match error {
            StandardsError::UnknownMessageType { message_type } => {
                ValidateError::UnknownMessageType { message_type }
            }
            other => ValidateError::Standards(other),
        }
    }
}

/// A text block that could not be read back into fields.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("message text must start with '{{4:'")]
    MissingBlockStart,

    #[error("message text must end with '-}}'")]
    MissingBlockEnd,

    #[error("line {line}: expected ':TAG:' but found '{text}'")]
    MalformedLine { line: usize, text: String },

    #[error("line {line}: tag {tag} appears more than once")]
    DuplicateTag { line: usize, tag: String },
}

pub type Result<T> = std::result::Result<T, ValidateError>;
