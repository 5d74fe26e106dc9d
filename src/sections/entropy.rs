//! Entropy section - bonus points for a large effective character pool.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

/// Estimated entropy in bits: `length * log2(pool size)`.
///
/// The pool size only counts character classes that occur in the password.
/// An empty password has zero entropy.
pub fn entropy_bits(password: &str) -> f64 {
    // Lowercase, uppercase, digits, everything else
    let pools = [
        (password.chars().any(|c| c.is_ascii_lowercase()), 26u32),
        (password.chars().any(|c| c.is_ascii_uppercase()), 26),
        (password.chars().any(|c| c.is_ascii_digit()), 10),
        (password.chars().any(|c| !c.is_ascii_alphanumeric()), 32),
    ];
    let pool: u32 = pools
        .iter()
        .filter(|(present, _)| *present)
        .map(|(_, size)| size)
        .sum();
    if pool == 0 {
        return 0.0;
    }
    password.chars().count() as f64 * f64::from(pool).log2()
}

/// Awards points for estimated entropy.
///
/// # Returns
/// - No reasons; this section never fails
/// - `score` of +20 above 50 bits, +10 above 30 bits, else 0
pub fn entropy_section(password: &SecretString) -> SectionResult {
    let bits = entropy_bits(password.expose_secret());
    let score = if bits > 50.0 {
        20
    } else if bits > 30.0 {
        10
    } else {
        0
    };
    SectionResult {
        reasons: Vec::new(),
        score,
    }
}
