//! Accounting-style number normalization.
//!
//! Extracts print negatives with a trailing minus ("123-"). Tokens that look
//! numeric become `Int`/`Float`; everything else passes through as text.

use regex::Regex;
use std::sync::LazyLock;

use crate::types::FieldValue;

static NUMERIC_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?[0-9]+(?:\.[0-9]+)?-?$").expect("numeric token pattern compiles")
});

/// Plain or accounting-style number: optional sign, digits, optional
/// fraction, optional trailing minus.
pub fn is_numeric_token(token: &str) -> bool {
    NUMERIC_TOKEN.is_match(token)
}

fn is_unsigned_decimal(s: &str) -> bool {
    let digits = s.replacen('.', "", 1);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Classify a token as a number or text. Never fails.
///
/// - `"123-"` → `Int(-123)`, `"12.5-"` → `Float(-12.5)`
/// - `"42"` → `Int(42)`, `"3.14"` → `Float(3.14)`
/// - anything else (including integers too large for `i64`) → `Text`
pub fn normalize_number(token: &str) -> FieldValue {
    let s = token.trim();

    if let Some(body) = s.strip_suffix('-') {
        if is_unsigned_decimal(body) {
            if body.contains('.') {
                if let Ok(v) = body.parse::<f64>() {
                    return FieldValue::Float(-v);
                }
            } else if let Ok(v) = body.parse::<i64>() {
                return FieldValue::Int(-v);
            }
        }
    }

    let parsed = if s.contains('.') {
        s.parse::<f64>().ok().map(FieldValue::Float)
    } else {
        s.parse::<i64>().ok().map(FieldValue::Int)
    };
    parsed.unwrap_or_else(|| FieldValue::text(s))
}
