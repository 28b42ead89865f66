use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

// ── Compiled regex cache ─────────────────────────────────────────────────────

macro_rules! re {
    ($name:ident, $pat:expr) => {
        fn $name() -> &'static Regex {
            static R: OnceLock<Regex> = OnceLock::new();
            R.get_or_init(|| Regex::new($pat).expect("invalid regex"))
        }
    };
}

// Indian mobile: 10 digits starting 6–9, optional +91 country code.
re!(re_phone,
    r"\b(?:\+?91[-.\s]?)?[6-9]\d{9}\b");
re!(re_phone_separator,
    r"[-.\s+]");

re!(re_date_day_first,
    r"\b\d{1,2}[/-]\d{1,2}[/-]\d{2,4}\b");
re!(re_date_year_first,
    r"\b\d{2,4}[/-]\d{1,2}[/-]\d{1,2}\b");

re!(re_amount,
    r"₹?\s*(\d+(?:,\d{3})*(?:\.\d{2})?)");
re!(re_decimal_digit,
    r"^\d$");

// ── Public extraction API ─────────────────────────────────────────────────────

/// Pattern extractors over the aggregated, sanitized bill text.
pub struct Extractor;

impl Extractor {
    /// Phone numbers with separators stripped, in order of first appearance.
    /// A `+91` prefix is kept as the digits `91`.
    pub fn phone_numbers(text: &str) -> Vec<String> {
        let mut found: Vec<String> = Vec::new();
        for m in re_phone().find_iter(text) {
            let digits = re_phone_separator().replace_all(m.as_str(), "").into_owned();
            if !found.contains(&digits) {
                found.push(digits);
            }
        }
        found
    }

    /// Date-shaped substrings, day-first matches before year-first ones.
    /// Nothing is checked against the calendar.
    pub fn dates(text: &str) -> Vec<String> {
        [re_date_day_first(), re_date_year_first()]
            .iter()
            .flat_map(|re| re.find_iter(text).map(|m| m.as_str().to_string()))
            .collect()
    }

    /// Every number on the bill, with or without a leading `₹`.
    pub fn amounts(text: &str) -> Vec<f64> {
        re_amount()
            .captures_iter(text)
            .filter_map(|c| parse_amount_str(c.get(1)?.as_str()))
            .collect()
    }
}

// ── Amount parsing ────────────────────────────────────────────────────────────

/// Parse a matched amount. Digits from any script are folded to ASCII and
/// grouping commas dropped. Values beyond `Decimal`'s 28 digits fall back to
/// a plain float parse.
fn parse_amount_str(s: &str) -> Option<f64> {
    let clean: String = s
        .chars()
        .filter(|&c| c != ',')
        .map(|c| if c == '.' { Some(c) } else { ascii_digit(c) })
        .collect::<Option<_>>()?;
    match Decimal::from_str(&clean) {
        Ok(d) => d.to_f64(),
        Err(_) => clean.parse::<f64>().ok(),
    }
}

/// Map a Unicode decimal digit (`\d`) to its ASCII counterpart.
///
/// Decimal digit blocks are contiguous runs of ten starting at zero, so the
/// value is the distance back to the start of the run, modulo ten.
fn ascii_digit(c: char) -> Option<char> {
    if c.is_ascii_digit() {
        return Some(c);
    }
    if !is_decimal_digit(c) {
        return None;
    }
    let mut steps = 0u32;
    let mut code = u32::from(c);
    while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
        if !is_decimal_digit(prev) {
            break;
        }
        steps += 1;
        code -= 1;
    }
    char::from_digit(steps % 10, 10)
}

fn is_decimal_digit(c: char) -> bool {
    let mut buf = [0u8; 4];
    re_decimal_digit().is_match(c.encode_utf8(&mut buf))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
