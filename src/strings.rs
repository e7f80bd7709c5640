//! String utilities
//!
//! Integer decoding with C `atoi` semantics, used by the settings accessors.

/// Decode the leading integer of `s` the way C `atoi` does
///
/// Skips leading whitespace, accepts one optional sign, then consumes
/// decimal digits. Anything unparsable yields 0; overflow saturates.
pub fn atoi64(s: &str) -> i64 {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    for b in digits.bytes().take_while(u8::is_ascii_digit) {
        let digit = i64::from(b - b'0');
        value = if negative {
            value.saturating_mul(10).saturating_sub(digit)
        } else {
            value.saturating_mul(10).saturating_add(digit)
        };
    }
    value
}
