//! Compiler for SWIFT field format specifications.
//!
//! Supported notation:
//!
//! - `6!n` fixed length, `35x` variable length (1 to 35)
//! - `4*35x` or `35x*4` up to four lines of at most 35 characters
//! - `YYMMDD` / `YYYYMMDD` calendar dates
//! - `/` and line breaks (`\n` escape or a literal newline) as separators
//! - `[...]` optional groups, e.g. `[/34x]`
//!
//! Character classes: `n` numeric, `a` alpha, `c` alphanumeric, `d` decimal,
//! `x` SWIFT X set, `z` SWIFT Z set.

use lc_model::{CharClass, CompiledFormat, ComponentKind, FormatComponent, FormatError, Separator};

/// Compile a format specification. Pure: equal input gives equal output.
pub fn compile(spec: &str) -> Result<CompiledFormat, FormatError> {
    let components = Parser::new(spec).parse()?;
    Ok(CompiledFormat {
        spec: spec.to_string(),
        components,
    })
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
    pending: Separator,
    pending_pos: usize,
    group: Option<(u16, usize, usize)>,
    next_group: u16,
    components: Vec<FormatComponent>,
}

impl Parser {
    fn new(spec: &str) -> Self {
        Self {
            chars: spec.chars().collect(),
            pos: 0,
            pending: Separator::None,
            pending_pos: 0,
            group: None,
            next_group: 0,
            components: Vec::new(),
        }
    }

    fn parse(mut self) -> Result<Vec<FormatComponent>, FormatError> {
        if self.chars.is_empty() {
            return Err(FormatError::new("", 0, "empty format specification"));
        }

        while let Some(c) = self.peek() {
            match c {
                '[' => self.open_group()?,
                ']' => self.close_group()?,
                '/' => self.separator(Separator::Slash, 1)?,
                '\n' => self.separator(Separator::Newline, 1)?,
                '\r' if self.peek_at(1) == Some('\n') => self.separator(Separator::Newline, 2)?,
                '\\' if self.peek_at(1) == Some('n') => self.separator(Separator::Newline, 2)?,
                'Y' => self.date_component()?,
                c if c.is_ascii_digit() => self.length_component()?,
                other => {
                    return Err(FormatError::new(
                        other.to_string(),
                        self.pos,
                        "unexpected character",
                    ));
                }
            }
        }

        if let Some((_, open_pos, _)) = self.group {
            return Err(FormatError::new("[", open_pos, "unclosed optional group"));
        }
        if self.pending != Separator::None {
            return Err(FormatError::new(
                self.pending.as_str(),
                self.pending_pos,
                "separator must be followed by a component",
            ));
        }
        Ok(self.components)
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn token_from(&self, start: usize) -> String {
        let end = (self.pos + 1).min(self.chars.len());
        self.chars[start..end].iter().collect()
    }

    fn open_group(&mut self) -> Result<(), FormatError> {
        if self.group.is_some() {
            return Err(FormatError::new("[", self.pos, "nested optional groups are not supported"));
        }
        self.group = Some((self.next_group, self.pos, self.components.len()));
        self.next_group += 1;
        self.pos += 1;
        Ok(())
    }

    fn close_group(&mut self) -> Result<(), FormatError> {
        let Some((_, _, first_component)) = self.group else {
            return Err(FormatError::new("]", self.pos, "unbalanced ']'"));
        };
        if self.components.len() == first_component {
            return Err(FormatError::new("]", self.pos, "empty optional group"));
        }
        if self.pending != Separator::None {
            return Err(FormatError::new(
                self.pending.as_str(),
                self.pending_pos,
                "separator must be followed by a component",
            ));
        }
        self.group = None;
        self.pos += 1;
        Ok(())
    }

    fn separator(&mut self, separator: Separator, width: usize) -> Result<(), FormatError> {
        if self.pending != Separator::None {
            return Err(FormatError::new(
                separator.as_str(),
                self.pos,
                "consecutive separators",
            ));
        }
        if separator == Separator::Newline && self.components.is_empty() {
            return Err(FormatError::new(
                separator.as_str(),
                self.pos,
                "format cannot open with a line break",
            ));
        }
        self.pending = separator;
        self.pending_pos = self.pos;
        self.pos += width;
        Ok(())
    }

    fn date_component(&mut self) -> Result<(), FormatError> {
        let start = self.pos;
        let rest: String = self.chars[start..].iter().collect();
        let len = if rest.starts_with("YYYYMMDD") {
            8
        } else if rest.starts_with("YYMMDD") {
            6
        } else {
            let token: String = rest.chars().take(8).collect();
            return Err(FormatError::new(token, start, "expected YYMMDD or YYYYMMDD"));
        };
        self.pos += len;
        self.push(ComponentKind::Fixed, CharClass::Date, len as u16, len as u16, None);
        Ok(())
    }

    fn length_component(&mut self) -> Result<(), FormatError> {
        let start = self.pos;
        let first = self.number(start)?;

        if self.peek() == Some('*') {
            // SWIFT notation: lines*width class
            self.pos += 1;
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(FormatError::new(
                    self.token_from(start),
                    start,
                    "expected line width after '*'",
                ));
            }
            let width = self.number(start)?;
            if self.peek() == Some('!') {
                return Err(FormatError::new(
                    self.token_from(start),
                    start,
                    "repeated lines cannot be fixed length",
                ));
            }
            let class = self.class(start)?;
            return self.repeated(start, class, first, width);
        }

        let fixed = if self.peek() == Some('!') {
            self.pos += 1;
            true
        } else {
            false
        };
        let class = self.class(start)?;

        if self.peek() == Some('*') {
            // Alternate notation: width class * lines
            self.pos += 1;
            if fixed {
                return Err(FormatError::new(
                    self.token_from(start),
                    start,
                    "repeated lines cannot be fixed length",
                ));
            }
            if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
                return Err(FormatError::new(
                    self.token_from(start),
                    start,
                    "expected line count after '*'",
                ));
            }
            let lines = self.number(start)?;
            return self.repeated(start, class, lines, first);
        }

        if fixed {
            self.push(ComponentKind::Fixed, class, first, first, None);
        } else {
            self.push(ComponentKind::Variable, class, 1, first, None);
        }
        Ok(())
    }

    fn repeated(
        &mut self,
        start: usize,
        class: CharClass,
        lines: u16,
        width: u16,
    ) -> Result<(), FormatError> {
        if class == CharClass::Decimal {
            return Err(FormatError::new(
                self.chars[start..self.pos].iter().collect::<String>(),
                start,
                "decimal components cannot span lines",
            ));
        }
        self.push(ComponentKind::Repeated, class, 1, width, Some(lines));
        Ok(())
    }

    fn number(&mut self, start: usize) -> Result<u16, FormatError> {
        let digits_start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.pos += 1;
        }
        let digits: String = self.chars[digits_start..self.pos].iter().collect();
        let value: u16 = digits.parse().map_err(|_| {
            FormatError::new(self.token_from(start), start, "length out of range")
        })?;
        if value == 0 {
            return Err(FormatError::new(
                self.chars[start..self.pos].iter().collect::<String>(),
                start,
                "length must be positive",
            ));
        }
        Ok(value)
    }

    fn class(&mut self, start: usize) -> Result<CharClass, FormatError> {
        match self.peek().and_then(CharClass::from_code) {
            Some(class) => {
                self.pos += 1;
                Ok(class)
            }
            None => Err(FormatError::new(
                self.token_from(start),
                start,
                "expected character class (n, a, c, d, x, z)",
            )),
        }
    }

    fn push(
        &mut self,
        kind: ComponentKind,
        char_class: CharClass,
        min_len: u16,
        max_len: u16,
        line_count: Option<u16>,
    ) {
        let separator = std::mem::take(&mut self.pending);
        self.components.push(FormatComponent {
            kind,
            char_class,
            min_len,
            max_len,
            line_count,
            separator,
            group: self.group.map(|(id, _, _)| id),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed_numeric() {
        let format = compile("6!n").unwrap();
        assert_eq!(format.components.len(), 1);
        let c = &format.components[0];
        assert_eq!(c.kind, ComponentKind::Fixed);
        assert_eq!(c.char_class, CharClass::Numeric);
        assert_eq!((c.min_len, c.max_len), (6, 6));
    }

    #[test]
    fn both_repetition_notations_agree() {
        let swift = compile("5*65x").unwrap();
        let alternate = compile("65x*5").unwrap();
        assert_eq!(swift.components, alternate.components);
        assert_eq!(swift.components[0].line_count, Some(5));
        assert_eq!(swift.components[0].max_len, 65);
    }

    #[test]
    fn slash_separated_segments() {
        let format = compile("3!a/15d").unwrap();
        assert_eq!(format.components[1].separator, Separator::Slash);
        assert_eq!(format.components[1].char_class, CharClass::Decimal);
    }

    #[test]
    fn optional_group_marks_components() {
        let format = compile("[/34x]\\n4*35x").unwrap();
        assert_eq!(format.components[0].group, Some(0));
        assert_eq!(format.components[0].separator, Separator::Slash);
        assert_eq!(format.components[1].group, None);
        assert_eq!(format.components[1].separator, Separator::Newline);
    }

    #[test]
    fn errors_name_token_and_position() {
        let err = compile("3!a/15q").unwrap_err();
        assert_eq!(err.position, 4);
        assert_eq!(err.token, "15q");

        let err = compile("6!").unwrap_err();
        assert_eq!(err.position, 0);

        let err = compile("0n").unwrap_err();
        assert_eq!(err.reason, "length must be positive");

        assert!(compile("").is_err());
        assert!(compile("[35x").is_err());
        assert!(compile("35x]").is_err());
        assert!(compile("35x/").is_err());
        assert!(compile("35x//35x").is_err());
        assert!(compile("4*15d").is_err());
        assert!(compile("35 x").is_err());
        assert!(compile("YYMM").is_err());
    }
}
