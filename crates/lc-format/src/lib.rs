//! SWIFT MT field format grammar.
//!
//! [`compile`] turns a format specification such as `3!a15d` or
//! `[/34x]\n4*35x` into a [`CompiledFormat`](lc_model::CompiledFormat);
//! [`match_value`] checks a field value against it and reports the first
//! component that could not be satisfied.

pub mod cache;
pub mod charset;
pub mod grammar;
pub mod matcher;

pub use cache::FormatCache;
pub use charset::parse_swift_date;
pub use grammar::compile;
pub use matcher::{FormatMatch, FormatMismatch, match_value, normalize_line_breaks};
