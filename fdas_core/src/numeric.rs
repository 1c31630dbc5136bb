//! # Numeric Helpers
//!
//! Clamping and rounding shared by every derivation stage.
//!
//! User input is never rejected for being out of range: values are clamped
//! into the field's valid range, and anything non-numeric (empty text, NaN)
//! falls back to the range minimum.
//!
//! Rounding goes through [`snap`] first so that products like `100 × 1.1`
//! (which is `110.00000000000001` in binary floating point) round up to
//! 110 and not 111.
//!
//! ```rust
//! use fdas_core::numeric::{ceil_count, clamp_number, parse_number};
//!
//! assert_eq!(clamp_number(-4.0, 0.0, 10.0), 0.0);
//! assert_eq!(clamp_number(f64::NAN, 0.5, 10.0), 0.5);
//! assert_eq!(clamp_number(parse_number("abc"), 0.0, 1.0), 0.0);
//! assert_eq!(ceil_count(100.0 * 1.1), 110);
//! ```

use serde_json::Value;

/// Largest count a single floor may hold for one device.
pub const MAX_DEVICE_COUNT: u64 = 99_999;

/// Decimal places kept by [`snap`].
const SNAP_SCALE: f64 = 1e6;

/// Clamp `value` into `[min, max]`; NaN becomes `min`.
pub fn clamp_number(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Parse user text as a number. Unparsable text yields NaN so that
/// [`clamp_number`] maps it to the range minimum.
pub fn parse_number(text: &str) -> f64 {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// Interpret a JSON value as a number the same way [`parse_number`] does
/// for text. Non-numeric values become NaN.
pub fn number_from_json(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().unwrap_or(f64::NAN),
        Value::String(s) => parse_number(s),
        Value::Bool(b) => {
            if *b {
                1.0
            } else {
                0.0
            }
        }
        _ => f64::NAN,
    }
}

/// Clamp a raw per-floor device count to `[0, MAX_DEVICE_COUNT]`.
///
/// Fractional counts are truncated.
pub fn clamp_count(value: f64) -> u64 {
    clamp_number(value, 0.0, MAX_DEVICE_COUNT as f64).trunc() as u64
}

/// Round away binary floating point noise below six decimal places.
pub fn snap(value: f64) -> f64 {
    (value * SNAP_SCALE).round() / SNAP_SCALE
}

/// `ceil` of a non-negative quantity, as a count. Negative or NaN input
/// yields 0.
pub fn ceil_count(value: f64) -> u64 {
    let v = snap(value).ceil();
    if v.is_nan() || v <= 0.0 {
        0
    } else {
        v as u64
    }
}

/// `floor` of a quantity, keeping the sign so callers can detect a
/// non-positive capacity.
pub fn floor_signed(value: f64) -> i64 {
    let v = snap(value).floor();
    if v.is_nan() {
        0
    } else {
        v as i64
    }
}

/// Integer ceiling division; a divisor of 0 is treated as 1.
pub fn div_ceil(numerator: u64, divisor: u64) -> u64 {
    numerator.div_ceil(divisor.max(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_clamp_number_bounds() {
        assert_eq!(clamp_number(0.5, 0.0, 1.0), 0.5);
        assert_eq!(clamp_number(2.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp_number(-1.0, 0.0, 1.0), 0.0);
        assert_eq!(clamp_number(f64::NAN, 50.0, 1000.0), 50.0);
    }

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number(" 12 "), 12.0);
        assert_eq!(parse_number("0.25"), 0.25);
        assert!(parse_number("").is_nan());
        assert!(parse_number("ten").is_nan());
    }

    #[test]
    fn test_number_from_json() {
        assert_eq!(number_from_json(&json!(7)), 7.0);
        assert_eq!(number_from_json(&json!("3")), 3.0);
        assert!(number_from_json(&json!(null)).is_nan());
        assert!(number_from_json(&json!([1, 2])).is_nan());
    }

    #[test]
    fn test_clamp_count() {
        assert_eq!(clamp_count(-5.0), 0);
        assert_eq!(clamp_count(f64::NAN), 0);
        assert_eq!(clamp_count(12.9), 12);
        assert_eq!(clamp_count(1e9), MAX_DEVICE_COUNT);
    }

    #[test]
    fn test_ceil_count_ignores_float_noise() {
        // 10 * 1.1 == 11.000000000000002 in f64
        assert_eq!(ceil_count(10.0 * 1.1), 11);
        assert_eq!(ceil_count(100.0 * 1.1), 110);
        assert_eq!(ceil_count(3.125), 4);
        assert_eq!(ceil_count(0.0), 0);
        assert_eq!(ceil_count(-2.0), 0);
    }

    #[test]
    fn test_floor_signed() {
        assert_eq!(floor_signed(250.0 * 0.8), 200);
        assert_eq!(floor_signed(250.0 * (1.0 - 0.7)), 75);
        assert_eq!(floor_signed(-0.5), -1);
    }

    #[test]
    fn test_div_ceil() {
        assert_eq!(div_ceil(11, 1), 11);
        assert_eq!(div_ceil(11, 2), 6);
        assert_eq!(div_ceil(0, 3), 0);
        assert_eq!(div_ceil(5, 0), 5);
    }
}
