//! # Validation Module
//!
//! Turns raw form strings into exact integers and checks free-text fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Browser                                                       │
//! │  └── <input type="number"> hints, easily bypassed                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                   │
//! │  ├── Exact decimal parsing (no f64 round trip)                         │
//! │  └── Length limits on labels                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculator                                                    │
//! │  └── Business rules (negative income, savings > income)                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use picofi_core::validation::{parse_scaled, validate_row_name};
//!
//! // "12.34" with two decimals is 1234 minor units
//! assert_eq!(parse_scaled("income", "12.34", 2).unwrap(), 1234);
//!
//! validate_row_name("Savings Account").unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};

/// Longest accepted savings row label.
pub const MAX_ROW_NAME_LEN: usize = 100;

// =============================================================================
// Numeric Parsing
// =============================================================================

/// Parses a plain decimal string into an integer scaled by `10^scale`.
///
/// ## Rules
/// - Optional leading `+` or `-`
/// - Digits with at most one `.`; either side of the dot may be empty,
///   but not both
/// - Fractional digits beyond `scale` must all be zero
/// - No exponent, grouping separators or symbols
///
/// ## Example
/// ```rust
/// use picofi_core::validation::parse_scaled;
///
/// assert_eq!(parse_scaled("rate", "2", 2).unwrap(), 200);
/// assert_eq!(parse_scaled("rate", "-0.5", 2).unwrap(), -50);
/// assert!(parse_scaled("rate", "0.125", 2).is_err());
/// ```
pub fn parse_scaled(field: &str, text: &str, scale: u32) -> ValidationResult<i64> {
    let raw = text.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let invalid = || ValidationError::InvalidNumber {
        field: field.to_string(),
        value: raw.to_string(),
    };
    let out_of_range = || ValidationError::OutOfRange {
        field: field.to_string(),
    };

    let (negative, body) = match raw.as_bytes()[0] {
        b'-' => (true, &raw[1..]),
        b'+' => (false, &raw[1..]),
        _ => (false, raw),
    };

    let (int_part, frac_part) = body.split_once('.').unwrap_or((body, ""));
    if int_part.is_empty() && frac_part.is_empty() {
        return Err(invalid());
    }
    let all_digits = |s: &str| s.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(int_part) || !all_digits(frac_part) {
        return Err(invalid());
    }

    let significant = frac_part.trim_end_matches('0').as_bytes();
    if significant.len() > scale as usize {
        return Err(ValidationError::TooPrecise {
            field: field.to_string(),
            max: scale,
        });
    }

    // Accumulate in i128 and bail as soon as we leave i64 territory
    let mut value: i128 = 0;
    let digits = int_part
        .bytes()
        .chain((0..scale as usize).map(|i| significant.get(i).copied().unwrap_or(b'0')));
    for b in digits {
        value = value * 10 + i128::from(b - b'0');
        if value > i64::MAX as i128 {
            return Err(out_of_range());
        }
    }

    if negative {
        value = -value;
    }
    i64::try_from(value).map_err(|_| out_of_range())
}

// =============================================================================
// String Validators
// =============================================================================

/// Validates a savings row label.
///
/// ## Rules
/// - Must not be blank (the form parser treats blank as end of rows anyway)
/// - At most [`MAX_ROW_NAME_LEN`] characters
pub fn validate_row_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > MAX_ROW_NAME_LEN {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: MAX_ROW_NAME_LEN,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scaled_accepts_plain_decimals() {
        assert_eq!(parse_scaled("x", "0", 2).unwrap(), 0);
        assert_eq!(parse_scaled("x", "100000", 2).unwrap(), 10_000_000);
        assert_eq!(parse_scaled("x", "-10000", 2).unwrap(), -1_000_000);
        assert_eq!(parse_scaled("x", "1.5", 2).unwrap(), 150);
        assert_eq!(parse_scaled("x", "1.50000", 2).unwrap(), 150);
        assert_eq!(parse_scaled("x", "7", 0).unwrap(), 7);
    }

    #[test]
    fn test_parse_scaled_rejects_garbage() {
        assert!(matches!(
            parse_scaled("income", "  ", 2),
            Err(ValidationError::Required { .. })
        ));
        for bad in ["-", ".", "1.2.3", "1e3", "NaN", "inf", "12abc", "1 000", "--1"] {
            assert!(
                matches!(parse_scaled("income", bad, 2), Err(ValidationError::InvalidNumber { .. })),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_scaled_precision_and_range() {
        assert!(matches!(
            parse_scaled("x", "0.001", 2),
            Err(ValidationError::TooPrecise { max: 2, .. })
        ));
        assert!(matches!(
            parse_scaled("x", "92233720368547758.08", 2),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert_eq!(
            parse_scaled("x", "92233720368547758.07", 2).unwrap(),
            i64::MAX
        );
    }

    #[test]
    fn test_validate_row_name() {
        assert!(validate_row_name("Savings Account").is_ok());
        assert!(validate_row_name("").is_err());
        assert!(validate_row_name("   ").is_err());
        assert!(validate_row_name(&"A".repeat(101)).is_err());
        assert!(validate_row_name(&"A".repeat(100)).is_ok());
    }
}
