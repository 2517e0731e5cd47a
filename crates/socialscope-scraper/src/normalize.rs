//! Human-readable counts and identity cleanup.
//!
//! Social pages render counters as "1.5M" or "12,345"; [`parse_count`]
//! turns those back into integers and [`format_count`] produces them for
//! display. Both are lossy above 1,000 by one decimal place.

const THOUSAND: u64 = 1_000;
const MILLION: u64 = 1_000_000;
const BILLION: u64 = 1_000_000_000;

/// Renders `n` with a single-letter magnitude suffix and one decimal place.
///
/// Values below 1,000 are rendered as plain integers.
#[must_use]
pub fn format_count(n: u64) -> String {
    #[allow(clippy::cast_precision_loss)]
    let scaled = |unit: u64| n as f64 / unit as f64;
    if n >= BILLION {
        format!("{:.1}B", scaled(BILLION))
    } else if n >= MILLION {
        format!("{:.1}M", scaled(MILLION))
    } else if n >= THOUSAND {
        format!("{:.1}K", scaled(THOUSAND))
    } else {
        n.to_string()
    }
}

/// Parses a rendered count such as `"1.5M"`, `"800k"` or `"12,345"`.
///
/// Commas and whitespace are ignored and the suffix is case-insensitive.
/// Anything unparsable, negative, or non-finite yields `0`.
#[must_use]
pub fn parse_count(raw: &str) -> u64 {
    let cleaned: String = raw
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase();

    let (digits, multiplier) = match cleaned.chars().last() {
        Some('k') => (&cleaned[..cleaned.len() - 1], THOUSAND),
        Some('m') => (&cleaned[..cleaned.len() - 1], MILLION),
        Some('b') => (&cleaned[..cleaned.len() - 1], BILLION),
        _ => (cleaned.as_str(), 1),
    };

    let Ok(value) = digits.parse::<f64>() else {
        return 0;
    };
    if !value.is_finite() || value < 0.0 {
        return 0;
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    let count = (value * multiplier as f64).round() as u64;
    count
}

/// Normalizes a user-supplied handle: trims, drops leading `@`, lower-cases.
///
/// Idempotent, so callers may sanitize more than once.
#[must_use]
pub fn sanitize_identity(raw: &str) -> String {
    raw.trim().trim_start_matches('@').trim().to_lowercase()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
