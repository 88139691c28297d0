//! Text normalisation and value coercion
//!
//! Values arrive from the query layer either natively typed or as text that
//! was already formatted for humans (thousands separators, Arabic-Indic
//! digits, trailing percent signs). Everything that needs to look "through"
//! that formatting goes through this module.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::Value;

/// Normalise a column name for marker matching.
///
/// Strips whitespace, tatweel, zero-width joiners, bidi marks and Arabic
/// diacritics, then lowercases.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|&c| !is_ignorable_in_name(c))
        .flat_map(char::to_lowercase)
        .collect()
}

fn is_ignorable_in_name(c: char) -> bool {
    c.is_whitespace()
        || matches!(
            c,
            '\u{0640}' | '\u{200C}' | '\u{200D}' | '\u{200E}' | '\u{200F}' | '\u{061C}'
        )
        || is_arabic_diacritic(c)
}

/// Harakat and related combining marks
pub fn is_arabic_diacritic(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// True when the text contains any code point in the Arabic block
pub fn looks_arabic(text: &str) -> bool {
    text.chars().any(|c| ('\u{0600}'..='\u{06FF}').contains(&c))
}

/// A number recovered from text
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParsedNumber {
    Plain(f64),
    /// A value written with a trailing percent sign; displayed as-is and
    /// never summed.
    Percent(f64),
}

impl ParsedNumber {
    pub fn value(&self) -> f64 {
        match self {
            ParsedNumber::Plain(v) | ParsedNumber::Percent(v) => *v,
        }
    }
}

/// Parse human-formatted numeric text.
///
/// Thousands separators (`,`, `٬`, no-break spaces) are dropped,
/// Arabic-Indic digits and the Arabic decimal separator are mapped to ASCII,
/// and a trailing `%` or `٪` yields [`ParsedNumber::Percent`].
pub fn parse_number(text: &str) -> Option<ParsedNumber> {
    let trimmed = text.trim();
    let (body, percent) = match trimmed.strip_suffix(['%', '\u{066A}']) {
        Some(rest) => (rest.trim_end(), true),
        None => (trimmed, false),
    };

    let mut ascii = String::with_capacity(body.len());
    for c in body.chars() {
        match c {
            ',' | '\u{066C}' | '\u{00A0}' | '\u{202F}' => {}
            '\u{066B}' => ascii.push('.'),
            '\u{0660}'..='\u{0669}' => ascii.push(arabic_digit(c, '\u{0660}')),
            '\u{06F0}'..='\u{06F9}' => ascii.push(arabic_digit(c, '\u{06F0}')),
            '0'..='9' | '.' | '-' | '+' | 'e' | 'E' => ascii.push(c),
            _ => return None,
        }
    }

    if !ascii.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let value: f64 = ascii.parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(if percent {
        ParsedNumber::Percent(value)
    } else {
        ParsedNumber::Plain(value)
    })
}

fn arabic_digit(c: char, zero: char) -> char {
    let offset = c as u32 - zero as u32;
    char::from_digit(offset, 10).unwrap_or('0')
}

/// A value usable in arithmetic: native numbers and plain numeric text.
/// Percent text is excluded.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(v) if v.is_finite() => Some(*v),
        Value::Text(s) => match parse_number(s)? {
            ParsedNumber::Plain(v) => Some(v),
            ParsedNumber::Percent(_) => None,
        },
        _ => None,
    }
}

/// A value that reads as a number, percent text included
pub fn is_number_like(value: &Value) -> bool {
    match value {
        Value::Number(v) => v.is_finite(),
        Value::Text(s) => parse_number(s).is_some(),
        _ => false,
    }
}

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y", "%Y.%m.%d"];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Parse date-like text into a timestamp (midnight for plain dates)
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt);
        }
    }
    for format in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(text, format) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    DateTime::parse_from_rfc3339(text)
        .ok()
        .map(|dt| dt.naive_local())
}

/// A value usable as a date
pub fn coerce_date(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Date(d) => d.and_hms_opt(0, 0, 0),
        Value::DateTime(dt) => Some(*dt),
        Value::Text(s) => parse_date(s),
        _ => None,
    }
}
