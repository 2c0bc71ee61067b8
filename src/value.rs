//! Pure helper functions over `serde_json::Value` used inside rule checks.
//!
//! Everything here is a free function with no captured state so the rule
//! predicates built on top stay trivially testable in isolation.

use std::cmp::Ordering;
use std::sync::LazyLock;

use serde_json::Value;

static EMAIL_REGEX: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$"
    ).expect("email pattern is valid")
});

// ============================================================================
// KIND CHECKS
// ============================================================================

/// An integer is an i64/u64, or a float with no fractional part.
pub(crate) fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => {
            n.is_i64()
                || n.is_u64()
                || n.as_f64().is_some_and(|f| f.is_finite() && f.fract() == 0.0)
        }
        _ => false,
    }
}

/// Numeric means a JSON number, or a string that parses as a finite f64.
pub(crate) fn is_numeric(value: &Value) -> bool {
    match value {
        Value::Number(_) => true,
        Value::String(s) => s.trim().parse::<f64>().is_ok_and(f64::is_finite),
        _ => false,
    }
}

/// A date is a string in ISO 8601 date or datetime form.
pub(crate) fn is_date(value: &Value) -> bool {
    value.as_str().is_some_and(|s| parse_timestamp(s).is_some())
}

/// Emptiness is polymorphic: arrays check length, objects check key
/// count, strings check non-blank. `null` counts as empty; emptiness does
/// not apply to numbers and booleans, which pass.
pub(crate) fn is_not_empty(value: &Value) -> bool {
    match value {
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::String(s) => !s.trim().is_empty(),
        Value::Null => false,
        Value::Bool(_) | Value::Number(_) => true,
    }
}

/// Matches the email format pattern (strings only).
pub(crate) fn is_email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_REGEX.is_match(s))
}

// ============================================================================
// MEASUREMENT
// ============================================================================

/// Length of a value: strings in Unicode scalar values, arrays in
/// elements. Other kinds have no length.
pub(crate) fn measure(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

// ============================================================================
// ORDERING
// ============================================================================

/// Partial order used by the `min`/`max` rules.
///
/// Numbers compare as f64. Strings compare as ISO 8601 timestamps when
/// both parse. Everything else is unordered.
pub(crate) fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => {
            Some(parse_timestamp(x)?.cmp(&parse_timestamp(y)?))
        }
        _ => None,
    }
}

// ============================================================================
// ISO 8601 PARSING
// ============================================================================

/// Parses `YYYY-MM-DD`, optionally followed by `THH:MM:SS`, fractional
/// seconds (1-3 digits) and a timezone (`Z` or `+HH:MM`/`-HH:MM`), into
/// milliseconds since the Unix epoch.
///
/// Hours: 0..=23, minutes: 0..=59, seconds: 0..=60 (60 for leap second).
pub(crate) fn parse_timestamp(input: &str) -> Option<i64> {
    let bytes = input.as_bytes();
    if bytes.len() < 10 {
        return None;
    }

    let year = i64::from(parse_digits(bytes, 0, 4)?);
    if bytes[4] != b'-' || bytes[7] != b'-' {
        return None;
    }
    let month = parse_digits(bytes, 5, 2)?;
    let day = parse_digits(bytes, 8, 2)?;
    if !(1..=12).contains(&month) || day < 1 || day > days_in_month(year, month) {
        return None;
    }

    let mut millis = days_from_civil(year, month, day) * 86_400_000;
    if bytes.len() == 10 {
        return Some(millis);
    }

    // Time part: THH:MM:SS
    if bytes[10] != b'T' && bytes[10] != b' ' {
        return None;
    }
    if bytes.len() < 19 || bytes[13] != b':' || bytes[16] != b':' {
        return None;
    }
    let hour = parse_digits(bytes, 11, 2)?;
    let minute = parse_digits(bytes, 14, 2)?;
    let second = parse_digits(bytes, 17, 2)?;
    if hour > 23 || minute > 59 || second > 60 {
        return None;
    }
    millis += i64::from(hour * 3600 + minute * 60 + second) * 1000;

    let mut pos = 19;

    // Fractional seconds: 1-3 digits
    if pos < bytes.len() && bytes[pos] == b'.' {
        let start = pos + 1;
        let mut end = start;
        while end < bytes.len() && bytes[end].is_ascii_digit() && end - start < 3 {
            end += 1;
        }
        if end == start {
            return None;
        }
        let frac = parse_digits(bytes, start, end - start)?;
        let scale = 10u32.pow(3 - (end - start) as u32);
        millis += i64::from(frac * scale);
        pos = end;
    }

    // Timezone: Z or +/-HH:MM
    match bytes.get(pos) {
        None => Some(millis),
        Some(b'Z') if pos + 1 == bytes.len() => Some(millis),
        Some(sign @ (b'+' | b'-')) => {
            if pos + 6 != bytes.len() || bytes[pos + 3] != b':' {
                return None;
            }
            let oh = parse_digits(bytes, pos + 1, 2)?;
            let om = parse_digits(bytes, pos + 4, 2)?;
            if oh > 23 || om > 59 {
                return None;
            }
            let offset = i64::from(oh * 3600 + om * 60) * 1000;
            Some(if *sign == b'+' {
                millis - offset
            } else {
                millis + offset
            })
        }
        Some(_) => None,
    }
}

/// Parses `n` ASCII digits starting at `offset`.
fn parse_digits(bytes: &[u8], offset: usize, n: usize) -> Option<u32> {
    if offset + n > bytes.len() {
        return None;
    }
    let mut result = 0u32;
    for &b in &bytes[offset..offset + n] {
        let digit = b.wrapping_sub(b'0');
        if digit > 9 {
            return None;
        }
        result = result * 10 + u32::from(digit);
    }
    Some(result)
}

fn is_leap_year(year: i64) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

fn days_in_month(year: i64, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        _ => 28,
    }
}

/// Days since 1970-01-01 for a proleptic Gregorian civil date.
fn days_from_civil(year: i64, month: u32, day: u32) -> i64 {
    let y = year - i64::from(month <= 2);
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

// ============================================================================
// TESTS
// ============================================================================
