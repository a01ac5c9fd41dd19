//! Interpreting extracted values: amounts, dates, quantities and free text.
//!
//! Amounts and quantities are exact decimals; nothing here goes through
//! floating point.

use std::fmt;

use chrono::NaiveDate;
use lc_format::parse_swift_date;
use rust_decimal::Decimal;

/// A monetary amount with an optional ISO currency code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    pub currency: Option<String>,
    pub value: Decimal,
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(currency) => write!(f, "{currency} {}", self.value),
            None => write!(f, "{}", self.value),
        }
    }
}

/// Parse `USD500000,00` (SWIFT), `USD 500,000.00`, `500.000,00 EUR` or `$1,250.50`.
pub fn parse_amount(raw: &str) -> Option<Amount> {
    let compact: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }

    let (currency, number) = split_currency(&compact);
    let value = parse_number(number)?;
    Some(Amount { currency, value })
}

fn split_currency(text: &str) -> (Option<String>, &str) {
    for (symbol, code) in [("$", "USD"), ("€", "EUR"), ("£", "GBP"), ("¥", "JPY")] {
        if let Some(rest) = text.strip_prefix(symbol) {
            return (Some(code.to_string()), rest);
        }
    }

    let letters = |s: &str| s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic());
    if text.len() > 3 && text.is_char_boundary(3) && letters(&text[..3]) {
        return (Some(text[..3].to_ascii_uppercase()), &text[3..]);
    }
    let split = text.len().saturating_sub(3);
    if split > 0 && text.is_char_boundary(split) && letters(&text[split..]) {
        return (Some(text[split..].to_ascii_uppercase()), &text[..split]);
    }
    (None, text)
}

/// Decimal number with either `,` or `.` as the decimal mark.
///
/// When both appear the last one is the decimal mark. A single separator
/// followed by exactly three digits is a thousands separator, except a
/// lone trailing comma (`500000,`), which is the SWIFT decimal form.
pub fn parse_number(text: &str) -> Option<Decimal> {
    if text.is_empty() || !text.chars().all(|c| c.is_ascii_digit() || c == ',' || c == '.') {
        return None;
    }
    if !text.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    let commas = text.matches(',').count();
    let dots = text.matches('.').count();
    let decimal_mark = match (commas, dots) {
        (0, 0) => None,
        (_, 0) if commas > 1 => None,
        (0, _) if dots > 1 => None,
        (1, 0) => decimal_or_grouping(text, ','),
        (0, 1) => decimal_or_grouping(text, '.'),
        _ => text.rfind([',', '.']).and_then(|i| text[i..].chars().next()),
    };

    let mut normalized = String::with_capacity(text.len());
    for c in text.chars() {
        match (c, decimal_mark) {
            (',' | '.', Some(mark)) if c == mark => normalized.push('.'),
            (',' | '.', _) => {}
            (digit, _) => normalized.push(digit),
        }
    }
    let normalized = normalized.strip_suffix('.').unwrap_or(&normalized);
    normalized.parse().ok()
}

fn decimal_or_grouping(text: &str, separator: char) -> Option<char> {
    let (_, fraction) = text.split_once(separator)?;
    if fraction.len() == 3 {
        None
    } else {
        Some(separator)
    }
}

/// Percentage tolerance from SWIFT field 39A (`10/10`: plus 10 %, minus 10 %).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tolerance {
    pub plus: Decimal,
    pub minus: Decimal,
}

impl Tolerance {
    /// The highest amount permitted under `base`, or `None` when it does not fit a `Decimal`.
    pub fn ceiling(&self, base: Decimal) -> Option<Decimal> {
        let margin = base
            .checked_mul(self.plus)?
            .checked_div(Decimal::ONE_HUNDRED)?;
        base.checked_add(margin)
    }
}

/// Field 39A is `2n/2n`; anything else is not a tolerance.
pub fn parse_tolerance(raw: &str) -> Option<Tolerance> {
    let (plus, minus) = raw.trim().split_once('/')?;
    Some(Tolerance {
        plus: percentage(plus)?,
        minus: percentage(minus)?,
    })
}

fn percentage(raw: &str) -> Option<Decimal> {
    if raw.is_empty() || raw.len() > 2 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u32>().ok().map(Decimal::from)
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d", "%d/%m/%Y", "%d.%m.%Y", "%d-%m-%Y", "%d %b %Y", "%d-%b-%Y", "%d %B %Y",
    "%b %d, %Y", "%B %d, %Y", "%b %d %Y", "%B %d %Y",
];

/// Parse a date as found on trade documents.
///
/// A leading run of six or eight digits is read as SWIFT `YYMMDD` /
/// `YYYYMMDD`, so `240930LONDON` (field 31D) yields 30 September 2024.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let text = raw.lines().next().unwrap_or_default().trim();
    let digits = text.chars().take_while(char::is_ascii_digit).count();
    if matches!(digits, 6 | 8) {
        return parse_swift_date(&text[..digits]);
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
}

/// A counted quantity such as `5,000 UNITS`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantity {
    pub value: Decimal,
    pub unit: String,
}

pub fn parse_quantity(raw: &str) -> Option<Quantity> {
    let text = raw.trim();
    let end = text
        .find(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .unwrap_or(text.len());
    let value = parse_number(&text[..end])?;
    let unit = normalize_text(&text[end..], true);
    Some(Quantity { value, unit })
}

/// Upper-case, single-spaced text; punctuation removed when asked.
pub fn normalize_text(raw: &str, strip_punctuation: bool) -> String {
    let upper = raw.to_uppercase();
    let cleaned: String = if strip_punctuation {
        upper
            .chars()
            .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
            .collect()
    } else {
        upper
    };
    cleaned.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Name line of a party field: skips a leading `/account` line.
pub fn party_name(raw: &str) -> &str {
    raw.lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !line.starts_with('/'))
        .unwrap_or_default()
}

/// Numbers mentioned in a text, normalized (`5,000` and `5000` agree).
pub fn numbers_in(raw: &str) -> Vec<Decimal> {
    raw.split(|c: char| !(c.is_ascii_digit() || c == ',' || c == '.'))
        .map(|token| token.trim_matches([',', '.']))
        .filter(|token| !token.is_empty())
        .filter_map(parse_number)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(text: &str) -> Decimal {
        text.parse().unwrap()
    }

    #[test]
    fn amount_representations_agree() {
        let swift = parse_amount("USD500000,00").unwrap();
        let printed = parse_amount("USD 500,000.00").unwrap();
        let trailing = parse_amount("500.000,00 usd").unwrap();
        assert_eq!(swift, printed);
        assert_eq!(swift, trailing);
        assert_eq!(swift.value, dec("500000"));
        assert_eq!(parse_amount("USD500000,").unwrap().value, dec("500000"));
        assert_eq!(parse_amount("$1,250.50").unwrap().currency.as_deref(), Some("USD"));
        assert_eq!(parse_amount("1,250").unwrap().value, dec("1250"));
    }

    #[test]
    fn unreadable_amounts() {
        assert!(parse_amount("").is_none());
        assert!(parse_amount("USD").is_none());
        assert!(parse_amount("FIVE HUNDRED").is_none());
        assert!(parse_amount("USD 12-34").is_none());
    }

    #[test]
    fn tolerance_widens_the_ceiling() {
        let tolerance = parse_tolerance("10/10").unwrap();
        assert_eq!(tolerance.ceiling(dec("500000")), Some(dec("550000")));
        assert!(parse_tolerance("10").is_none());
    }

    #[test]
    fn tolerance_accepts_only_two_digit_pairs() {
        assert_eq!(
            parse_tolerance(" 5/05 "),
            Some(Tolerance { plus: dec("5"), minus: dec("5") })
        );
        for raw in ["-50/0", "TEN", "500/0", "10.5/10", "10/10/10", "/10", "10/", "+5/5"] {
            assert!(parse_tolerance(raw).is_none(), "{raw}");
        }
    }

    #[test]
    fn ceiling_overflow_is_none() {
        let tolerance = parse_tolerance("10/10").unwrap();
        assert_eq!(tolerance.ceiling(Decimal::MAX), None);
    }

    #[test]
    fn dates_in_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2024, 9, 30);
        assert_eq!(parse_date("240930"), expected);
        assert_eq!(parse_date("240930LONDON"), expected);
        assert_eq!(parse_date("2024-09-30"), expected);
        assert_eq!(parse_date("30/09/2024"), expected);
        assert_eq!(parse_date("30 Sep 2024"), expected);
        assert_eq!(parse_date("September 30, 2024"), expected);
        assert_eq!(parse_date("soon"), None);
    }

    #[test]
    fn quantities_and_text() {
        let quantity = parse_quantity("5,000 units").unwrap();
        assert_eq!(quantity.value, dec("5000"));
        assert_eq!(quantity.unit, "UNITS");
        assert_eq!(normalize_text("  Xyz   Export\nCorp. ", false), "XYZ EXPORT CORP.");
        assert_eq!(normalize_text("Xyz Export Corp.", true), "XYZ EXPORT CORP");
        assert_eq!(party_name("/123456\nXYZ EXPORT CORPORATION\nLONDON"), "XYZ EXPORT CORPORATION");
        assert_eq!(numbers_in("5000 UNITS, SIZE 42."), vec![dec("5000"), dec("42")]);
    }
}
