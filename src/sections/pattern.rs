//! Pattern analysis section - detects common, easily guessed patterns.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;

/// Case-insensitive substrings that mark a password as weak.
const WEAK_SEQUENCES: [&str; 5] = ["123456", "654321", "qwerty", "password", "admin"];

const PATTERN_PENALTY: i32 = -10;

type PatternCheck = fn(&str) -> bool;

/// Analyzes the password for common patterns.
///
/// Checks run in order and stop at the first match, so a password matching
/// several patterns is penalized once.
///
/// # Returns
/// - One reason and a score of -10 if any common pattern matches
/// - An empty result otherwise
pub fn pattern_analysis_section(password: &SecretString) -> SectionResult {
    let pwd = password.expose_secret();
    let checks: [PatternCheck; 3] = [has_repeated_run, has_weak_sequence, is_letters_then_digits];

    let mut result = SectionResult::default();
    if checks.iter().any(|check| check(pwd)) {
        result.fail("Password contains common patterns that are easily guessed");
        result.add(PATTERN_PENALTY);
    }
    result
}

/// Three or more identical consecutive characters (e.g., "aaa", "111").
/// Line terminators never form a run.
fn has_repeated_run(pwd: &str) -> bool {
    let chars: Vec<char> = pwd.chars().collect();
    chars
        .windows(3)
        .any(|w| w[0] == w[1] && w[1] == w[2] && !is_line_terminator(w[0]))
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn has_weak_sequence(pwd: &str) -> bool {
    let lower = pwd.to_ascii_lowercase();
    WEAK_SEQUENCES.iter().any(|seq| lower.contains(seq))
}

/// Whole password is ASCII letters followed by ASCII digits only.
fn is_letters_then_digits(pwd: &str) -> bool {
    let digits_start = pwd.find(|c: char| !c.is_ascii_alphabetic()).unwrap_or(pwd.len());
    let (letters, digits) = pwd.split_at(digits_start);
    !letters.is_empty() && !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    const REASON: &str = "Password contains common patterns that are easily guessed";

    #[test]
    fn test_pattern_section_repetitive_chars() {
        let result = pattern_analysis_section(&secret("Passwordaaa123!"));
        assert_eq!(result.reasons, vec![REASON.to_string()]);
        assert_eq!(result.score, -10);
    }

    #[test]
    fn test_pattern_section_weak_sequence_case_insensitive() {
        let result = pattern_analysis_section(&secret("MyQWERTYkeyboard!9"));
        assert_eq!(result.reasons, vec![REASON.to_string()]);
        let result = pattern_analysis_section(&secret("Password123456"));
        assert_eq!(result.reasons, vec![REASON.to_string()]);
    }

    #[test]
    fn test_pattern_section_letters_then_digits() {
        assert!(is_letters_then_digits("Abcdefgh2024"));
        assert!(!is_letters_then_digits("Abcdefgh2024!"));
        assert!(!is_letters_then_digits("2024Abcdefgh"));
        assert!(!is_letters_then_digits("Abcdefgh"));
        assert!(!is_letters_then_digits("12345"));
        assert!(!is_letters_then_digits(""));
    }

    #[test]
    fn test_pattern_section_multiple_matches_penalized_once() {
        // Repeated run, weak sequence and letters-then-digits all match
        let result = pattern_analysis_section(&secret("adminnn123"));
        assert_eq!(result.reasons.len(), 1);
        assert_eq!(result.score, -10);
    }

    #[test]
    fn test_pattern_section_strong_password() {
        let result = pattern_analysis_section(&secret("MyStr0ng!P@ssw0rd2024"));
        assert_eq!(result, SectionResult::default());
    }

    #[test]
    fn test_pattern_section_two_repeats_allowed() {
        assert!(!has_repeated_run("aabbcc11"));
        assert!(has_repeated_run("ab111c"));
    }

    #[test]
    fn test_pattern_section_line_terminators_do_not_repeat() {
        assert!(!has_repeated_run("ab\n\n\ncd"));
    }

    #[test]
    fn test_pattern_section_too_short() {
        let result = pattern_analysis_section(&secret("ab"));
        assert_eq!(result, SectionResult::default());
    }
}
