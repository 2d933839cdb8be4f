//! Conversions between submitted scores, stored values, and display strings.
//!
//! Stored values always rank higher-is-better. Lower-is-better games store
//! `INVERT_BASE - t` for an elapsed time `t`, so one descending query serves
//! both polarities.
//!
//! Clamping for timed games happens on the duration, before inversion: `t` is
//! truncated and capped to `[0, INVERT_BASE]`, which keeps the stored value in
//! the same range without a second clamp.

use crate::catalog::{Polarity, ScoreFormat};

/// Largest integer a double represents exactly (`2^53 - 1`).
pub const MAX_SAFE_SCORE: u64 = 9_007_199_254_740_991;

/// Offset used to invert lower-is-better durations.
pub const INVERT_BASE: u64 = 10_000;

/// Suffix thresholds for [`format_compact`], largest first.
const MAGNITUDES: [(f64, &str); 6] = [
    (1e18, "Qi"),
    (1e15, "Q"),
    (1e12, "T"),
    (1e9, "B"),
    (1e6, "M"),
    (1e3, "K"),
];

/// A value forced into the storable domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sanitized {
    pub value: u64,
    /// True when the input fell outside `[0, ceiling]` and was capped.
    pub clamped: bool,
}

fn clamp_to(raw: f64, ceiling: u64) -> Sanitized {
    if raw.is_nan() || raw < 0.0 {
        return Sanitized {
            value: 0,
            clamped: true,
        };
    }
    let truncated = raw.trunc();
    if truncated > ceiling as f64 {
        Sanitized {
            value: ceiling,
            clamped: true,
        }
    } else {
        Sanitized {
            value: truncated as u64,
            clamped: false,
        }
    }
}

/// Truncate `raw` to an integer in `[0, MAX_SAFE_SCORE]`.
pub fn sanitize(raw: f64) -> Sanitized {
    clamp_to(raw, MAX_SAFE_SCORE)
}

/// Upper bound of the stored-value domain for a polarity.
pub fn storage_ceiling(polarity: Polarity) -> u64 {
    match polarity {
        Polarity::HigherIsBetter => MAX_SAFE_SCORE,
        Polarity::LowerIsBetter => INVERT_BASE,
    }
}

/// Clamp a value that is already in stored form (no polarity transform).
pub fn sanitize_stored(polarity: Polarity, stored: f64) -> Sanitized {
    clamp_to(stored, storage_ceiling(polarity))
}

/// Apply the polarity transform to a raw submission and make it storable.
pub fn encode_for_storage(polarity: Polarity, raw: f64) -> Sanitized {
    match polarity {
        Polarity::HigherIsBetter => sanitize(raw),
        Polarity::LowerIsBetter => {
            let duration = clamp_to(raw, INVERT_BASE);
            Sanitized {
                value: INVERT_BASE - duration.value,
                clamped: duration.clamped,
            }
        }
    }
}

/// Render a stored value for players.
///
/// Timed games show the recovered duration as `"<t>s"`; everything else uses
/// the game's [`ScoreFormat`].
pub fn decode_for_display(polarity: Polarity, format: ScoreFormat, stored: u64) -> String {
    match polarity {
        Polarity::LowerIsBetter => format!("{}s", INVERT_BASE.saturating_sub(stored)),
        Polarity::HigherIsBetter => match format {
            ScoreFormat::Compact => format_compact(stored),
            ScoreFormat::Grouped => format_grouped(stored),
        },
    }
}

/// `1.50K`, `2.00M`, ... with two decimals; values under a thousand are
/// rendered as plain integers.
pub fn format_compact(value: u64) -> String {
    let n = value as f64;
    for (idx, (threshold, suffix)) in MAGNITUDES.iter().enumerate() {
        if n < *threshold {
            continue;
        }
        let scaled = format!("{:.2}", n / threshold);
        // 999_999 rounds to "1000.00K"; show it as "1.00M" instead.
        if scaled.starts_with("1000.") && idx > 0 {
            let (larger, larger_suffix) = MAGNITUDES[idx - 1];
            return format!("{:.2}{}", n / larger, larger_suffix);
        }
        return format!("{scaled}{suffix}");
    }
    format_grouped(value)
}

/// Thousands-separated integer, e.g. `1,234,567`.
pub fn format_grouped(value: u64) -> String {
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
    use proptest::prelude::*;

    #[test]
    fn sanitize_truncates() {
        assert_eq!(
            sanitize(41.9),
            Sanitized {
                value: 41,
                clamped: false
            }
        );
        assert_eq!(sanitize(0.0).value, 0);
        assert!(!sanitize(-0.0).clamped);
    }

    #[test]
    fn sanitize_clamps_above_ceiling() {
        let s = sanitize(MAX_SAFE_SCORE as f64 + 1000.0);
        assert_eq!(s.value, MAX_SAFE_SCORE);
        assert!(s.clamped);

        let s = sanitize(f64::INFINITY);
        assert_eq!(s.value, MAX_SAFE_SCORE);
        assert!(s.clamped);
    }

    #[test]
    fn sanitize_exact_ceiling_is_not_clamped() {
        let s = sanitize(MAX_SAFE_SCORE as f64);
        assert_eq!(s.value, MAX_SAFE_SCORE);
        assert!(!s.clamped);
    }

    #[test]
    fn sanitize_negative_and_nan_floor_to_zero() {
        assert_eq!(
            sanitize(-5.0),
            Sanitized {
                value: 0,
                clamped: true
            }
        );
        assert_eq!(
            sanitize(f64::NAN),
            Sanitized {
                value: 0,
                clamped: true
            }
        );
    }

    #[test]
    fn timed_encoding_inverts() {
        let s = encode_for_storage(Polarity::LowerIsBetter, 42.0);
        assert_eq!(s.value, 9958);
        assert!(!s.clamped);

        // Fractional seconds are truncated before inversion.
        assert_eq!(encode_for_storage(Polarity::LowerIsBetter, 42.7).value, 9958);
    }

    #[test]
    fn timed_encoding_clamps_duration() {
        let s = encode_for_storage(Polarity::LowerIsBetter, 12_345.0);
        assert_eq!(s.value, 0);
        assert!(s.clamped);
        assert_eq!(
            decode_for_display(Polarity::LowerIsBetter, ScoreFormat::Compact, s.value),
            "10000s"
        );
    }

    #[test]
    fn higher_encoding_is_identity() {
        let s = encode_for_storage(Polarity::HigherIsBetter, 500.0);
        assert_eq!(s.value, 500);
    }

    #[test]
    fn sanitize_stored_uses_polarity_ceiling() {
        let s = sanitize_stored(Polarity::LowerIsBetter, 20_000.0);
        assert_eq!(s.value, INVERT_BASE);
        assert!(s.clamped);
        let s = sanitize_stored(Polarity::HigherIsBetter, 20_000.0);
        assert_eq!(s.value, 20_000);
        assert!(!s.clamped);
    }

    #[test]
    fn compact_thresholds() {
        assert_eq!(format_compact(0), "0");
        assert_eq!(format_compact(999), "999");
        assert_eq!(format_compact(1_000), "1.00K");
        assert_eq!(format_compact(1_500), "1.50K");
        assert_eq!(format_compact(999_994), "999.99K");
        assert_eq!(format_compact(999_999), "1.00M");
        assert_eq!(format_compact(999_999_999), "1.00B");
        assert_eq!(format_compact(2_500_000), "2.50M");
        assert_eq!(format_compact(1_000_000_000), "1.00B");
        assert_eq!(format_compact(1_230_000_000_000), "1.23T");
        assert_eq!(format_compact(MAX_SAFE_SCORE), "9.01Q");
        assert_eq!(format_compact(4_000_000_000_000_000_000), "4.00Qi");
    }

    #[test]
    fn grouped_inserts_separators() {
        assert_eq!(format_grouped(0), "0");
        assert_eq!(format_grouped(999), "999");
        assert_eq!(format_grouped(1_000), "1,000");
        assert_eq!(format_grouped(1_234_567), "1,234,567");
        assert_eq!(format_grouped(MAX_SAFE_SCORE), "9,007,199,254,740,991");
    }

    #[test]
    fn timed_display_of_foreign_value_saturates() {
        assert_eq!(
            decode_for_display(Polarity::LowerIsBetter, ScoreFormat::Compact, 50_000),
            "0s"
        );
    }

    proptest! {
        #[test]
        fn timed_round_trip(t in 0u64..=INVERT_BASE) {
            let stored = encode_for_storage(Polarity::LowerIsBetter, t as f64);
            prop_assert!(!stored.clamped);
            prop_assert_eq!(
                decode_for_display(Polarity::LowerIsBetter, ScoreFormat::Compact, stored.value),
                format!("{}s", t)
            );
        }

        #[test]
        fn sanitize_stays_in_range(raw in proptest::num::f64::ANY) {
            let s = sanitize(raw);
            prop_assert!(s.value <= MAX_SAFE_SCORE);
        }

        #[test]
        fn higher_encoding_preserves_order(a in 0u64..=MAX_SAFE_SCORE, b in 0u64..=MAX_SAFE_SCORE) {
            let ea = encode_for_storage(Polarity::HigherIsBetter, a as f64).value;
            let eb = encode_for_storage(Polarity::HigherIsBetter, b as f64).value;
            prop_assert_eq!(a.cmp(&b), ea.cmp(&eb));
        }

        #[test]
        fn timed_encoding_reverses_order(a in 0u64..=INVERT_BASE, b in 0u64..=INVERT_BASE) {
            let ea = encode_for_storage(Polarity::LowerIsBetter, a as f64).value;
            let eb = encode_for_storage(Polarity::LowerIsBetter, b as f64).value;
            prop_assert_eq!(a.cmp(&b), eb.cmp(&ea));
        }

        #[test]
        fn compact_display_is_total(v in any::<u64>()) {
            let s = format_compact(v);
            prop_assert!(!s.is_empty());
        }

        #[test]
        fn compact_mantissa_stays_below_next_suffix(v in 1_000u64..=MAX_SAFE_SCORE) {
            let s = format_compact(v);
            let mantissa: f64 = s
                .trim_end_matches(|c: char| c.is_ascii_alphabetic())
                .parse()
                .unwrap();
            prop_assert!(mantissa < 1000.0, "{} rendered as {}", v, s);
        }
    }
}
