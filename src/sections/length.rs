//! Length section - checks password minimum and maximum length.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

pub const MIN_LENGTH: usize = 12;
pub const MAX_LENGTH: usize = 128;

const MIN_LENGTH_SCORE: i32 = 20;

/// Checks if the password meets the length requirements.
///
/// Length is counted in characters, not bytes. Meeting the minimum earns
/// points; exceeding the maximum only rejects.
///
/// # Returns
/// - `reasons` with one entry per violated bound (too short, too long)
/// - `score` of +20 when the minimum is met, else 0
pub fn length_section(password: &SecretString) -> SectionResult {
    let len = password.expose_secret().chars().count();
    let mut result = SectionResult::default();

    if len < MIN_LENGTH {
        result.fail(format!(
            "Password must be at least {} characters long",
            MIN_LENGTH
        ));
    } else {
        result.add(MIN_LENGTH_SCORE);
    }

    if len > MAX_LENGTH {
        result.fail(format!(
            "Password must not exceed {} characters",
            MAX_LENGTH
        ));
    }

    result
}
