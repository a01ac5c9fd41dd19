//! Validation and construction of SWIFT MT7xx messages.
//!
//! Field values are checked against the schemas loaded by `lc-standards`;
//! field-level problems are returned as data in
//! [`MessageValidationResult`](lc_model::MessageValidationResult), while
//! [`ValidateError`] is reserved for unknown message types and unreadable
//! input.

pub mod assembler;
pub mod engine;
pub mod error;
pub mod field;
pub mod parser;
mod rules;

pub use assembler::{Assembly, assemble, normalize_values, serialize, validate_message};
pub use engine::{MessageRequest, MessageValidator, ParsedMessage};
pub use error::{ParseError, Result, ValidateError};
pub use field::validate_field;
pub use parser::parse_message;
