//! Free-text answers (city names).

use once_cell::sync::Lazy;
use regex::Regex;

pub const CITY_MIN_LEN: usize = 2;
pub const CITY_MAX_LEN: usize = 100;

/// Letters (including Latin-1 accented ones), whitespace, apostrophe, hyphen.
static CITY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-ZÀ-ÿ\s'\-]+$").expect("city pattern is a valid regex"));

/// Checks the trimmed input is within `min_len..=max_len` characters and
/// matches `allowed` in full.
pub fn validate_free_text(raw: &str, min_len: usize, max_len: usize, allowed: &Regex) -> bool {
    let text = raw.trim();
    let len = text.chars().count();
    (min_len..=max_len).contains(&len) && allowed.is_match(text)
}

/// City names: 2-100 characters, no digits or symbols.
pub fn validate_city_name(raw: &str) -> bool {
    validate_free_text(raw, CITY_MIN_LEN, CITY_MAX_LEN, &CITY_PATTERN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_accented_and_compound_names() {
        for raw in [
            "São Paulo",
            "Ribeirão Preto",
            "São José dos Campos",
            "Pau-d'Arco",
            "  Natal  ",
        ] {
            assert!(validate_city_name(raw), "{raw:?} should be valid");
        }
    }

    #[test]
    fn rejects_digits_symbols_and_bad_lengths() {
        let too_long = "A".repeat(CITY_MAX_LEN + 1);
        for raw in ["", "A", "   ", "São Paulo123", "City@Name", too_long.as_str()] {
            assert!(!validate_city_name(raw), "{raw:?} should be invalid");
        }
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        // 50 two-byte characters is 100 bytes but only 50 characters
        let accented = "ã".repeat(50);
        assert!(validate_city_name(&accented));

        let exactly_max = "é".repeat(CITY_MAX_LEN);
        assert!(validate_city_name(&exactly_max));
    }

    #[test]
    fn generic_validator_honours_custom_bounds_and_pattern() {
        let digits = Regex::new(r"^[0-9]+$").unwrap();
        assert!(validate_free_text(" 123 ", 3, 3, &digits));
        assert!(!validate_free_text("1234", 3, 3, &digits));
        assert!(!validate_free_text("12a", 3, 3, &digits));
    }
}
