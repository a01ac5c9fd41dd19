//! Reading a SWIFT text block back into a field map.

use std::collections::BTreeMap;

use lc_format::normalize_line_breaks;

use crate::assembler::{BLOCK_END, BLOCK_START};
use crate::error::ParseError;

/// Parse `{4:` ... `-}` into tag → value. Continuation lines are joined with `\n`.
pub fn parse_message(text: &str) -> Result<BTreeMap<String, String>, ParseError> {
    let text = normalize_line_breaks(text.trim());
    let body = text
        .strip_prefix(BLOCK_START)
        .ok_or(ParseError::MissingBlockStart)?
        .strip_suffix(BLOCK_END)
        .ok_or(ParseError::MissingBlockEnd)?;
    let body = body.strip_prefix('\n').unwrap_or(body);
    let body = body.strip_suffix('\n').unwrap_or(body);

    let mut fields: BTreeMap<String, String> = BTreeMap::new();
    if body.is_empty() {
        return Ok(fields);
    }

    let mut current: Option<String> = None;
    for (index, line) in body.split('\n').enumerate() {
        let line_no = index + 2;

        if let Some((tag, value)) = split_tag(line) {
            if fields.contains_key(tag) {
                return Err(ParseError::DuplicateTag {
                    line: line_no,
                    tag: tag.to_string(),
                });
            }
            fields.insert(tag.to_string(), value.to_string());
            current = Some(tag.to_string());
            continue;
        }

        match current.as_ref().and_then(|tag| fields.get_mut(tag)) {
            Some(value) if !line.starts_with(':') => {
                value.push('\n');
                value.push_str(line);
            }
            _ => {
                return Err(ParseError::MalformedLine {
                    line: line_no,
                    text: line.to_string(),
                });
            }
        }
    }

    Ok(fields)
}

/// Split `:32B:USD100,` into (`32B`, `USD100,`). Tags are two digits and an
/// optional upper-case letter.
fn split_tag(line: &str) -> Option<(&str, &str)> {
    let rest = line.strip_prefix(':')?;
    let (tag, value) = rest.split_once(':')?;
    let bytes = tag.as_bytes();
    let well_formed = match bytes {
        [a, b] => a.is_ascii_digit() && b.is_ascii_digit(),
        [a, b, c] => a.is_ascii_digit() && b.is_ascii_digit() && c.is_ascii_uppercase(),
        _ => false,
    };
    well_formed.then_some((tag, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_multi_line_values() {
        let text = "{4:\r\n:20:LC2024001\r\n:50:XYZ IMPORTS LTD.\r\nNEW YORK\r\n-}";
        let fields = parse_message(text).unwrap();
        assert_eq!(fields["20"], "LC2024001");
        assert_eq!(fields["50"], "XYZ IMPORTS LTD.\nNEW YORK");
    }

    #[test]
    fn empty_block_has_no_fields() {
        assert!(parse_message("{4:\r\n-}").unwrap().is_empty());
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_message(":20:X\r\n-}"), Err(ParseError::MissingBlockStart));
        assert_eq!(parse_message("{4:\r\n:20:X"), Err(ParseError::MissingBlockEnd));
        assert!(matches!(
            parse_message("{4:\r\nORPHAN\r\n-}"),
            Err(ParseError::MalformedLine { line: 2, .. })
        ));
        assert!(matches!(
            parse_message("{4:\r\n:20:A\r\n:20:B\r\n-}"),
            Err(ParseError::DuplicateTag { line: 3, .. })
        ));
    }
}
