//! Number rendering for report text: compact `k`/`M` abbreviation, en-US digit
//! grouping and fixed one-decimal output.

const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Rounds half-way cases towards positive infinity.
pub(crate) fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Abbreviate a magnitude: above one million → `M`, above one thousand → `k`.
/// Scaled values below 100 keep one decimal, larger ones are rounded to an
/// integer. Thresholds are strict, so `1000` stays `"1,000"`.
///
/// ```
/// # use battle_report::report::format_number;
/// assert_eq!(format_number(1500.0), "1.5k");
/// assert_eq!(format_number(150_000.0), "150k");
/// assert_eq!(format_number(2_500_000.0), "2.5M");
/// ```
pub fn format_number(n: f64) -> String {
    let (scaled, suffix) = if n > MILLION {
        (n / MILLION, "M")
    } else if n > THOUSAND {
        (n / THOUSAND, "k")
    } else {
        (n, "")
    };

    let rounded = if scaled < 100.0 {
        round_half_up(scaled * 10.0) / 10.0
    } else {
        round_half_up(scaled)
    };

    format!("{}{suffix}", format_grouped(rounded))
}

/// en-US locale rendering: `,` between thousands, at most three fraction
/// digits, trailing zeros dropped.
pub fn format_grouped(n: f64) -> String {
    let millis = (n.abs() * 1000.0).round() as u128;
    let whole = millis / 1000;
    let fraction = millis % 1000;

    let mut out = String::new();
    if n < 0.0 && millis != 0 {
        out.push('-');
    }
    out.push_str(&group_digits(whole));
    if fraction != 0 {
        let digits = format!("{fraction:03}");
        out.push('.');
        out.push_str(digits.trim_end_matches('0'));
    }
    out
}

/// Fixed one-decimal rendering with `toFixed(1)` rounding: the exact decimal
/// value of `n` decides, so `0.15` (stored just below the half) gives `"0.1"`.
/// Only a value sitting exactly on a half step rounds away from zero.
pub fn format_fixed1(n: f64) -> String {
    if n == 0.0 {
        return "0.0".to_string();
    }
    if n < 0.0 {
        return format!("-{}", format_fixed1(-n));
    }
    if is_exact_half_step(n) {
        return format!("{:.1}", ((n * 10.0).floor() + 1.0) / 10.0);
    }
    format!("{n:.1}")
}

/// `n * 10` ends in exactly `.5`; in binary that only happens for odd quarters.
fn is_exact_half_step(n: f64) -> bool {
    let quarters = n * 4.0;
    quarters.fract() == 0.0 && quarters % 2.0 == 1.0
}

fn group_digits(value: u128) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_values_are_not_abbreviated() {
        assert_eq!(format_number(0.0), "0");
        assert_eq!(format_number(150.0), "150");
        assert_eq!(format_number(500.0), "500");
        assert_eq!(format_number(12.34), "12.3");
    }

    #[test]
    fn thresholds_are_strict() {
        assert_eq!(format_number(1000.0), "1,000");
        assert_eq!(format_number(1000.5), "1k");
        assert_eq!(format_number(1_000_000.0), "1,000k");
        assert_eq!(format_number(1_000_001.0), "1M");
    }

    #[test]
    fn abbreviates_thousands_and_millions() {
        assert_eq!(format_number(1500.0), "1.5k");
        assert_eq!(format_number(99_950.0), "100k");
        assert_eq!(format_number(150_000.0), "150k");
        assert_eq!(format_number(2_500_000.0), "2.5M");
        assert_eq!(format_number(1_234_000_000.0), "1,234M");
    }

    #[test]
    fn negative_values_fall_through_unscaled() {
        assert_eq!(format_number(-5000.0), "-5,000");
        assert_eq!(format_number(-2.25), "-2.2");
    }

    #[test]
    fn grouped_matches_locale_output() {
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1_234_567.0), "1,234,567");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(0.12345), "0.123");
        assert_eq!(format_grouped(-999.0), "-999");
    }

    #[test]
    fn fixed1_rounds_exact_ties_up() {
        assert_eq!(format_fixed1(0.25), "0.3");
        assert_eq!(format_fixed1(1.25), "1.3");
        assert_eq!(format_fixed1(2.75), "2.8");
        assert_eq!(format_fixed1(1.0), "1.0");
        assert_eq!(format_fixed1(0.5), "0.5");
        assert_eq!(format_fixed1(85.71428), "85.7");
    }

    #[test]
    fn fixed1_follows_stored_value_below_half() {
        // 30/200 and 290/200 are stored just under 0.15 and 1.45.
        assert_eq!(format_fixed1(30.0 / 200.0), "0.1");
        assert_eq!(format_fixed1(290.0 / 200.0), "1.4");
        assert_eq!(format_fixed1(0.35), "0.3");
        assert_eq!(format_fixed1(0.45), "0.5");
    }

    #[test]
    fn fixed1_signs() {
        assert_eq!(format_fixed1(0.0), "0.0");
        assert_eq!(format_fixed1(-0.0), "0.0");
        assert_eq!(format_fixed1(-0.01), "-0.0");
        assert_eq!(format_fixed1(-0.25), "-0.3");
    }
}
