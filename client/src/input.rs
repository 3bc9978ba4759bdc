//! Keystroke-level normalization for form inputs.

use registration_core::identity::IdPrefix;

/// Longest phone number the form accepts.
pub const MAX_PHONE_DIGITS: usize = 11;

/// Strip everything but ASCII digits and keep at most 11 of them.
///
/// ```
/// use registration_client::sanitize_phone;
///
/// assert_eq!(sanitize_phone("(0414) 555-12.34 ext 99"), "04145551234");
/// ```
#[must_use]
pub fn sanitize_phone(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_digit)
        .take(MAX_PHONE_DIGITS)
        .collect()
}

/// Reshape free typing into `<letter>-<digits>`.
///
/// Upper-cases, drops separators, inserts the dash, and caps the digits at
/// the prefix's maximum. An unknown leading letter is kept alone so the user
/// sees what was rejected. The result may still be too short to be valid.
///
/// ```
/// use registration_client::format_identifier;
///
/// assert_eq!(format_identifier("j 00123 4567 89"), "J-001234567");
/// assert_eq!(format_identifier("v"), "V-");
/// ```
#[must_use]
pub fn format_identifier(raw: &str) -> String {
    let mut cleaned = raw
        .chars()
        .map(|c| c.to_ascii_uppercase())
        .filter(char::is_ascii_alphanumeric);

    let Some(letter) = cleaned.next() else {
        return String::new();
    };

    let Some(prefix) = IdPrefix::from_char(letter) else {
        return letter.to_string();
    };

    let max_digits = *prefix.digit_count().end();
    let digits: String = cleaned.filter(char::is_ascii_digit).take(max_digits).collect();

    format!("{prefix}-{digits}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_sanitize_phone_keeps_short_input() {
        assert_eq!(sanitize_phone("0212-555"), "0212555");
        assert_eq!(sanitize_phone("abc"), "");
    }

    #[test]
    fn test_format_identifier_caps_individual_digits_at_ten() {
        assert_eq!(format_identifier("V12345678901234"), "V-1234567890");
    }

    #[test]
    fn test_format_identifier_unknown_letter() {
        assert_eq!(format_identifier("x-123"), "X");
        assert_eq!(format_identifier("  "), "");
    }

    proptest! {
        #[test]
        fn prop_sanitized_phone_is_short_and_numeric(raw in ".{0,40}") {
            let phone = sanitize_phone(&raw);
            prop_assert!(phone.len() <= MAX_PHONE_DIGITS);
            prop_assert!(phone.chars().all(|c| c.is_ascii_digit()));
        }

        #[test]
        fn prop_formatting_is_idempotent(raw in "[a-zA-Z0-9 .-]{0,20}") {
            let once = format_identifier(&raw);
            prop_assert_eq!(format_identifier(&once), once);
        }
    }
}
