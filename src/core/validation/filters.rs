//! Entry-time field sanitizers
//!
//! Applied as the user types, so the form never holds characters that the
//! validators would reject outright.

/// Longest phone number the form keeps
pub const PHONE_DIGITS: usize = 10;

/// Filter: keep ASCII digits only
pub fn digits_only(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Filter: keep ASCII digits, capped at ten characters
pub fn phone(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(PHONE_DIGITS)
        .collect()
}
