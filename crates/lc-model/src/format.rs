//! Compiled SWIFT field formats.
//!
//! A format specification such as `3!a15d` or `[/34x]\n4*35x` compiles into
//! an ordered list of [`FormatComponent`]s. The compiler lives in
//! `lc-format`; these types are shared so that validation results and
//! schema listings can describe the expected shape of a value.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Character set accepted by a format component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharClass {
    /// `n`: digits 0-9.
    Numeric,
    /// `a`: upper case letters A-Z.
    Alpha,
    /// `c`: upper case letters and digits.
    Alphanumeric,
    /// `d`: digits with exactly one comma as decimal mark.
    Decimal,
    /// `YYMMDD` / `YYYYMMDD`: a calendar date.
    Date,
    /// `x`: the SWIFT X character set.
    FreeText,
    /// `z`: the SWIFT Z character set (X plus a few symbols).
    ExtendedText,
}

impl CharClass {
    /// Parse the single-letter SWIFT class code.
    pub fn from_code(code: char) -> Option<Self> {
        match code {
            'n' => Some(CharClass::Numeric),
            'a' => Some(CharClass::Alpha),
            'c' => Some(CharClass::Alphanumeric),
            'd' => Some(CharClass::Decimal),
            'x' => Some(CharClass::FreeText),
            'z' => Some(CharClass::ExtendedText),
            _ => None,
        }
    }

    /// Single-letter code used in format specifications.
    pub fn code(&self) -> &'static str {
        match self {
            CharClass::Numeric => "n",
            CharClass::Alpha => "a",
            CharClass::Alphanumeric => "c",
            CharClass::Decimal => "d",
            CharClass::Date => "date",
            CharClass::FreeText => "x",
            CharClass::ExtendedText => "z",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharClass::Numeric => "numeric",
            CharClass::Alpha => "alpha",
            CharClass::Alphanumeric => "alphanumeric",
            CharClass::Decimal => "decimal",
            CharClass::Date => "date",
            CharClass::FreeText => "free-text",
            CharClass::ExtendedText => "extended-text",
        }
    }

    /// Returns true for the multi-purpose text classes (`x`, `z`).
    pub fn is_text(&self) -> bool {
        matches!(self, CharClass::FreeText | CharClass::ExtendedText)
    }
}

impl fmt::Display for CharClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Length discipline of a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComponentKind {
    /// `6!n`: exactly `max_len` characters.
    Fixed,
    /// `35x`: between `min_len` and `max_len` characters.
    Variable,
    /// `4*35x`: up to `line_count` lines of at most `max_len` characters.
    Repeated,
}

/// Literal that must precede a component in the value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Separator {
    #[default]
    None,
    /// A literal `/`.
    Slash,
    /// A line break. Not required when the component opens the value.
    Newline,
}

impl Separator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Separator::None => "",
            Separator::Slash => "/",
            Separator::Newline => "\\n",
        }
    }
}

/// One executable piece of a compiled format.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormatComponent {
    pub kind: ComponentKind,
    pub char_class: CharClass,
    pub min_len: u16,
    pub max_len: u16,
    /// Maximum number of lines for [`ComponentKind::Repeated`].
    pub line_count: Option<u16>,
    pub separator: Separator,
    /// Optional group index (`[...]` in the specification).
    pub group: Option<u16>,
}

impl FormatComponent {
    pub fn is_optional(&self) -> bool {
        self.group.is_some()
    }

    /// Render the component without separator or brackets, e.g. `6!n`.
    pub fn pattern(&self) -> String {
        if self.char_class == CharClass::Date {
            return if self.max_len == 8 {
                "YYYYMMDD".to_string()
            } else {
                "YYMMDD".to_string()
            };
        }
        match self.kind {
            ComponentKind::Fixed => format!("{}!{}", self.max_len, self.char_class.code()),
            ComponentKind::Variable => format!("{}{}", self.max_len, self.char_class.code()),
            ComponentKind::Repeated => format!(
                "{}*{}{}",
                self.line_count.unwrap_or(1),
                self.max_len,
                self.char_class.code()
            ),
        }
    }
}

impl fmt::Display for FormatComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.separator.as_str(), self.pattern())
    }
}

/// Executable form of a field format specification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompiledFormat {
    /// The raw specification this was compiled from.
    pub spec: String,
    pub components: Vec<FormatComponent>,
}

impl CompiledFormat {
    /// Upper bound on the number of lines a value may span.
    pub fn max_lines(&self) -> usize {
        let mut lines = 1usize;
        for component in &self.components {
            if component.separator == Separator::Newline {
                lines += 1;
            }
            if let Some(count) = component.line_count {
                lines += usize::from(count.saturating_sub(1));
            }
        }
        lines
    }

    /// Returns true when the format has more than one component.
    pub fn is_composite(&self) -> bool {
        self.components.len() > 1
    }
}

impl fmt::Display for CompiledFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.spec)
    }
}

/// A format specification that could not be compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Serialize, Deserialize)]
#[error("invalid format token '{token}' at position {position}: {reason}")]
pub struct FormatError {
    /// The offending token (or the remaining input when no token applies).
    pub token: String,
    /// Character offset of the token in the specification.
    pub position: usize,
    pub reason: String,
}

impl FormatError {
    pub fn new(token: impl Into<String>, position: usize, reason: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            position,
            reason: reason.into(),
        }
    }
}
