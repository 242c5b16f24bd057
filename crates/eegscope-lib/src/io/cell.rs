//! Numeric coercion of individual cells.

/// One cell of a tabular source, before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Empty,
    Number(f64),
    Text(String),
    /// Booleans and formula errors: never numeric.
    Other,
}

impl Cell {
    pub fn text(value: &str) -> Self {
        Cell::Text(value.to_string())
    }

    /// Channel value of the cell, or `None` if the cell should be left out.
    ///
    /// Native numbers pass through. Text that is a complete decimal literal is
    /// taken as is; anything else keeps only digits, `.` and `-` and reads the
    /// leading decimal of what remains, so `"12 uV"` becomes `12.0`.
    pub fn coerce(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Cell::Text(text) => coerce_text(text),
            Cell::Empty | Cell::Other => None,
        }
    }

    /// Timestamp value of the cell: the leading decimal of its text, without
    /// stripping other characters.
    pub fn timestamp(&self) -> Option<f64> {
        match self {
            Cell::Number(value) => Some(*value).filter(|v| v.is_finite()),
            Cell::Text(text) => leading_decimal(text),
            Cell::Empty | Cell::Other => None,
        }
    }

    /// Text used when the cell is a header.
    pub fn label(&self) -> Option<String> {
        match self {
            Cell::Text(text) => Some(text.clone()),
            Cell::Number(value) => Some(value.to_string()),
            Cell::Empty | Cell::Other => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(text) => text.trim().is_empty(),
            _ => false,
        }
    }
}

pub fn coerce_text(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if let Ok(value) = trimmed.parse::<f64>() {
        if value.is_finite() {
            return Some(value);
        }
    }
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-'))
        .collect();
    leading_decimal(&cleaned)
}

/// Longest decimal literal at the start of `text` (after leading whitespace):
/// optional sign, digits with an optional fraction, optional exponent.
pub fn leading_decimal(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let digits_from = |start: usize| {
        bytes[start..]
            .iter()
            .take_while(|b| b.is_ascii_digit())
            .count()
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    let int_digits = digits_from(end);
    end += int_digits;
    let mut mantissa_digits = int_digits;
    if bytes.get(end) == Some(&b'.') {
        let frac_digits = digits_from(end + 1);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
            mantissa_digits += frac_digits;
        }
    }
    if mantissa_digits == 0 {
        return None;
    }
    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = digits_from(exp_end);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}
