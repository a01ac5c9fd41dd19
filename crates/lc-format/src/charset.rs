//! SWIFT character sets.

use chrono::NaiveDate;
use lc_model::CharClass;

/// Characters of the SWIFT X set besides letters and digits.
const X_SYMBOLS: &[char] = &['/', '-', '?', ':', '(', ')', '.', ',', '\'', '+', ' '];

/// Additional characters of the SWIFT Z set.
const Z_SYMBOLS: &[char] = &['=', '!', '"', '%', '&', '*', '<', '>', ';', '{', '@', '#', '_'];

/// Returns true if `c` belongs to the character class.
pub fn accepts(class: CharClass, c: char) -> bool {
    match class {
        CharClass::Numeric | CharClass::Date => c.is_ascii_digit(),
        CharClass::Alpha => c.is_ascii_uppercase(),
        CharClass::Alphanumeric => c.is_ascii_uppercase() || c.is_ascii_digit(),
        CharClass::Decimal => c.is_ascii_digit() || c == ',',
        CharClass::FreeText => c.is_ascii_alphanumeric() || X_SYMBOLS.contains(&c),
        CharClass::ExtendedText => {
            c.is_ascii_alphanumeric() || X_SYMBOLS.contains(&c) || Z_SYMBOLS.contains(&c)
        }
    }
}

/// Checks that apply to a whole run rather than single characters.
pub fn run_is_valid(class: CharClass, run: &[char]) -> bool {
    match class {
        CharClass::Decimal => is_swift_decimal(run),
        CharClass::Date => is_calendar_date(run),
        _ => true,
    }
}

/// SWIFT decimal: digits with exactly one comma, at least one digit before it.
fn is_swift_decimal(run: &[char]) -> bool {
    let commas = run.iter().filter(|c| **c == ',').count();
    commas == 1 && run.first().is_some_and(char::is_ascii_digit)
}

/// `YYMMDD` or `YYYYMMDD` naming a real calendar day.
pub fn is_calendar_date(run: &[char]) -> bool {
    let text: String = run.iter().collect();
    parse_swift_date(&text).is_some()
}

/// Parse a `YYMMDD` or `YYYYMMDD` date.
pub fn parse_swift_date(text: &str) -> Option<NaiveDate> {
    if !text.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    match text.len() {
        6 => NaiveDate::parse_from_str(text, "%y%m%d").ok(),
        8 => NaiveDate::parse_from_str(text, "%Y%m%d").ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chars(s: &str) -> Vec<char> {
        s.chars().collect()
    }

    #[test]
    fn alpha_is_upper_case_only() {
        assert!(accepts(CharClass::Alpha, 'U'));
        assert!(!accepts(CharClass::Alpha, 'u'));
    }

    #[test]
    fn x_set_excludes_z_symbols() {
        assert!(accepts(CharClass::FreeText, '/'));
        assert!(!accepts(CharClass::FreeText, '@'));
        assert!(accepts(CharClass::ExtendedText, '@'));
        assert!(!accepts(CharClass::ExtendedText, '\n'));
    }

    #[test]
    fn decimal_needs_one_comma() {
        assert!(run_is_valid(CharClass::Decimal, &chars("500000,00")));
        assert!(run_is_valid(CharClass::Decimal, &chars("1,")));
        assert!(!run_is_valid(CharClass::Decimal, &chars("500000")));
        assert!(!run_is_valid(CharClass::Decimal, &chars(",5")));
        assert!(!run_is_valid(CharClass::Decimal, &chars("1,000,00")));
    }

    #[test]
    fn dates_are_calendar_checked() {
        assert!(is_calendar_date(&chars("240229")));
        assert!(!is_calendar_date(&chars("230229")));
        assert!(is_calendar_date(&chars("20250518")));
        assert!(!is_calendar_date(&chars("241301")));
    }
}
