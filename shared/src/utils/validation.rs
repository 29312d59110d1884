//! Email and verification code validation utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Pragmatic email shape check: one @, non-empty local part, dotted domain.
// Everything beyond the @ is case-insensitive per RFC, and in practice no
// well-known provider uses case-sensitive local parts, so normalization
// lowercases the whole address.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap()
});

/// Check if an email address has a valid shape
pub fn is_valid_email(address: &str) -> bool {
    address.len() <= 320 && EMAIL_REGEX.is_match(address)
}

/// Normalize an email address for storage and comparison
pub fn normalize_email(address: &str) -> String {
    address.trim().to_lowercase()
}

/// Check if a verification code is well-formed (6 ASCII digits)
pub fn is_valid_verification_code(code: &str) -> bool {
    code.len() == 6 && code.chars().all(|c| c.is_ascii_digit())
}
