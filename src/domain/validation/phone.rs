//! Phone-number shape check for user identities.

const COUNTRY_CODE: &str = "55";

/// Keeps only ASCII digits.
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Accepts 10 or 11 digits (area code + number), or 12/13 digits when
/// prefixed with the Brazilian country code. Format check only.
pub fn validate_identity(raw: &str) -> bool {
    let digits = digits_only(raw);
    match digits.len() {
        10 | 11 => true,
        12 | 13 => digits.starts_with(COUNTRY_CODE),
        _ => false,
    }
}
