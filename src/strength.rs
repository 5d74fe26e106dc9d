//! Score-to-strength mapping.

use std::fmt;

/// Strength bucket derived from a validation score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PasswordStrength {
    VeryWeak,
    Weak,
    Moderate,
    Strong,
    VeryStrong,
}

impl PasswordStrength {
    /// Maps a score (0-100) to its strength bucket.
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => PasswordStrength::VeryStrong,
            60..=79 => PasswordStrength::Strong,
            40..=59 => PasswordStrength::Moderate,
            20..=39 => PasswordStrength::Weak,
            _ => PasswordStrength::VeryWeak,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PasswordStrength::VeryWeak => "Very Weak",
            PasswordStrength::Weak => "Weak",
            PasswordStrength::Moderate => "Moderate",
            PasswordStrength::Strong => "Strong",
            PasswordStrength::VeryStrong => "Very Strong",
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returns the human-readable strength label for a score.
pub fn strength_label(score: u8) -> &'static str {
    PasswordStrength::from_score(score).label()
}
