//! Character variety section - checks for lowercase, uppercase, digits, special chars.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

/// Characters accepted by the special-character rule.
pub const SPECIAL_CHARS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

const CLASS_SCORE: i32 = 15;

pub(crate) fn is_special(c: char) -> bool {
    SPECIAL_CHARS.contains(c)
}

/// Checks if the password contains each required character class.
///
/// Every class is checked independently; each missing class adds its own
/// reason and each present class earns points.
///
/// # Returns
/// - `reasons` for missing classes, in lowercase/uppercase/digit/special order
/// - `score` of +15 per class present
pub fn character_variety_section(password: &SecretString) -> SectionResult {
    let pwd = password.expose_secret();
    let checks = [
        (
            pwd.chars().any(|c| c.is_ascii_lowercase()),
            "Password must contain at least one lowercase letter",
        ),
        (
            pwd.chars().any(|c| c.is_ascii_uppercase()),
            "Password must contain at least one uppercase letter",
        ),
        (
            pwd.chars().any(|c| c.is_ascii_digit()),
            "Password must contain at least one number",
        ),
        (
            pwd.chars().any(is_special),
            "Password must contain at least one special character",
        ),
    ];

    let mut result = SectionResult::default();
    for (present, reason) in checks {
        if present {
            result.add(CLASS_SCORE);
        } else {
            result.fail(reason);
        }
    }
    result
}
