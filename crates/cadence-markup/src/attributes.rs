//! Lenient parsing of numeric markup attributes.
//!
//! Attribute values follow integer-prefix semantics: leading whitespace and an
//! optional sign are accepted, then as many decimal digits as are present.
//! Anything after the digits is ignored (`"150ms"` is 150). A value with no
//! leading digits has no numeric reading at all.

/// Parse the leading integer of `raw`, if any.
///
/// Values too large for `i64` saturate.
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let run = digits.bytes().take_while(u8::is_ascii_digit).count();
    if run == 0 {
        return None;
    }

    let magnitude = digits[..run].bytes().fold(0i64, |acc, b| {
        acc.saturating_mul(10).saturating_add(i64::from(b - b'0'))
    });
    Some(if negative { -magnitude } else { magnitude })
}

/// Reveal delay in milliseconds. Absent, non-numeric and negative values are 0.
pub fn parse_delay_ms(raw: Option<&str>) -> u64 {
    raw.and_then(parse_int_prefix)
        .map(|v| v.max(0) as u64)
        .unwrap_or(0)
}

/// Whether a `data-delay` value has no usable reading and falls back to 0:
/// no leading digits, or a negative number. Zeros in any spelling and values
/// with trailing text are fine.
pub fn is_degraded_delay(raw: &str) -> bool {
    parse_int_prefix(raw).is_none_or(|v| v < 0)
}

/// Counter target. `None` when the value has no numeric reading.
///
/// Negative targets clamp to 0.
pub fn parse_count(raw: &str) -> Option<u64> {
    parse_int_prefix(raw).map(|v| v.max(0) as u64)
}
