//! C-style floating point formatting.
//!
//! The AST dump prints numbers the way `printf("%g", x)` would, and the
//! backend prints immediates with `%.15g`. Rust's `Display` for `f64` uses a
//! shortest-roundtrip algorithm that disagrees with both, so this module
//! reimplements the `%g` rules: round to a number of significant digits,
//! pick fixed or scientific notation by exponent, strip trailing zeros.

/// Formats `value` like `printf("%.<sig>g", value)`.
///
/// Fixed notation is used when the decimal exponent `X` (after rounding to
/// `sig` significant digits) satisfies `-4 <= X < sig`; otherwise scientific
/// notation with a sign and at least two exponent digits is produced.
///
/// # Example
///
/// ```
/// use plabc_util::format_general;
///
/// assert_eq!(format_general(3.0, 6), "3");
/// assert_eq!(format_general(0.5, 6), "0.5");
/// assert_eq!(format_general(1234567.0, 6), "1.23457e+06");
/// ```
pub fn format_general(value: f64, sig: usize) -> String {
    let sig = sig.max(1);

    if value.is_nan() {
        return "nan".to_owned();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf" } else { "inf" }.to_owned();
    }
    if value == 0.0 {
        return "0".to_owned();
    }

    // Round to `sig` significant digits first; the exponent decision must be
    // made on the rounded value (9.9999e5 at 3 digits is 1e+06, not fixed).
    let sci = format!("{:.*e}", sig - 1, value);
    let (mantissa, exponent) = split_scientific(&sci);

    if exponent >= -4 && exponent < sig as i32 {
        let precision = (sig as i32 - 1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", precision, value);
        strip_fraction_zeros(&fixed)
    } else {
        let mantissa = strip_fraction_zeros(mantissa);
        format!("{}e{:+03}", mantissa, exponent)
    }
}

/// Splits `"{:e}"` output into mantissa text and exponent value.
fn split_scientific(text: &str) -> (&str, i32) {
    match text.rfind(['e', 'E']) {
        Some(split) => {
            let exponent = text[split + 1..].parse::<i32>().unwrap_or(0);
            (&text[..split], exponent)
        }
        None => (text, 0),
    }
}

/// Removes trailing zeros of a fractional part, and the dot if it empties.
fn strip_fraction_zeros(text: &str) -> String {
    if !text.contains('.') {
        return text.to_owned();
    }
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    trimmed.to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integers_print_bare() {
        assert_eq!(format_general(0.0, 6), "0");
        assert_eq!(format_general(1.0, 6), "1");
        assert_eq!(format_general(-3.0, 6), "-3");
        assert_eq!(format_general(42.0, 15), "42");
    }

    #[test]
    fn test_fractions_strip_zeros() {
        assert_eq!(format_general(0.5, 6), "0.5");
        assert_eq!(format_general(-2.25, 6), "-2.25");
        assert_eq!(format_general(3.14159265, 6), "3.14159");
        assert_eq!(format_general(0.1, 15), "0.1");
    }

    #[test]
    fn test_small_magnitudes() {
        assert_eq!(format_general(0.0001, 6), "0.0001");
        assert_eq!(format_general(0.00001, 6), "1e-05");
        assert_eq!(format_general(-0.00001, 6), "-1e-05");
    }

    #[test]
    fn test_large_magnitudes() {
        assert_eq!(format_general(1234567.0, 6), "1.23457e+06");
        assert_eq!(format_general(100000.0, 6), "100000");
        assert_eq!(format_general(1000000.0, 6), "1e+06");
        assert_eq!(format_general(1234567.0, 15), "1234567");
    }

    #[test]
    fn test_rounding_decides_notation() {
        // 999999.5 rounds up to 1e+06 at six significant digits.
        assert_eq!(format_general(999999.5, 6), "1e+06");
    }

    #[test]
    fn test_specials() {
        assert_eq!(format_general(f64::NAN, 6), "nan");
        assert_eq!(format_general(f64::INFINITY, 6), "inf");
        assert_eq!(format_general(f64::NEG_INFINITY, 6), "-inf");
    }
}
