//! Total conversions from loosely-typed markup values into typed fields.
//!
//! None of these functions fail. Mandatory variants fall back to the same defaults as the
//! optional ones but record a [`Diagnostic`] so partial records still flow through the import.

use crate::core::markup::{one_or_many, one_or_many_text};
use serde_json::Value;

/// A mandatory field that was absent or not textual in the source markup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub label: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Diagnostics {
    missing: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn missing_field(&mut self, label: &str) {
        tracing::warn!("Value {} is mandatory but missing from the markup", label);
        self.missing.push(Diagnostic {
            label: label.to_string(),
        });
    }

    pub fn len(&self) -> usize {
        self.missing.len()
    }

    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.missing.iter().map(|d| d.label.as_str())
    }

    pub fn contains(&self, label: &str) -> bool {
        self.labels().any(|l| l == label)
    }
}

pub fn mandatory_string(diagnostics: &mut Diagnostics, label: &str, value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => {
            diagnostics.missing_field(label);
            String::new()
        }
    }
}

pub fn optional_string(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        _ => String::new(),
    }
}

/// Leading-integer parse: skips leading whitespace, accepts a sign, stops at the first
/// non-digit. No digits at all yields 0.
pub fn parse_leading_int(text: &str) -> i64 {
    let text = text.trim_start();
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    // Out-of-range digit runs saturate at the i64 bounds.
    digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, d| {
            let digit = i64::from(d - b'0');
            if negative {
                acc.saturating_mul(10).saturating_sub(digit)
            } else {
                acc.saturating_mul(10).saturating_add(digit)
            }
        })
}

pub fn mandatory_number(diagnostics: &mut Diagnostics, label: &str, value: Option<&Value>) -> i64 {
    match value {
        Some(Value::String(s)) => parse_leading_int(s),
        _ => {
            diagnostics.missing_field(label);
            0
        }
    }
}

pub fn optional_number(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::String(s)) => parse_leading_int(s),
        _ => 0,
    }
}

/// Markup boolean: true only for the literal text `"true"`. Not general truthiness, so a JSON
/// `true`, `"True"` or `"1"` are all false.
pub fn markup_bool(value: Option<&Value>) -> bool {
    matches!(value, Some(Value::String(s)) if s == "true")
}

pub fn mandatory_boolean(diagnostics: &mut Diagnostics, label: &str, value: Option<&Value>) -> bool {
    if !matches!(value, Some(Value::String(_))) {
        diagnostics.missing_field(label);
    }
    markup_bool(value)
}

pub fn optional_boolean(value: Option<&Value>) -> bool {
    markup_bool(value)
}

/// Maps a repeatable element that the parser may have collapsed to a lone value.
pub fn optional_array<T, F>(value: Option<&Value>, mapper: F) -> Vec<T>
where
    F: FnMut(&Value) -> T,
{
    one_or_many(value).into_iter().map(mapper).collect()
}

/// [`optional_array`] for repeatables whose lone entry may be bare text.
pub fn optional_text_array<T, F>(value: Option<&Value>, mapper: F) -> Vec<T>
where
    F: FnMut(&Value) -> T,
{
    one_or_many_text(value).into_iter().map(mapper).collect()
}
