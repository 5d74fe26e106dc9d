//! Password policy evaluator - main evaluation logic.

use secrecy::SecretString;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::sections::{
    character_variety_section, entropy_section, length_section, pattern_analysis_section,
    SectionResult,
};
use crate::strength::PasswordStrength;

const MAX_SCORE: i32 = 100;

/// Result of validating a password against the policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordValidationResult {
    /// `true` iff no rule was violated.
    pub is_valid: bool,
    /// Rule-violation messages in check order.
    pub errors: Vec<String>,
    /// Heuristic strength score, 0-100.
    pub score: u8,
}

impl PasswordValidationResult {
    pub fn strength(&self) -> PasswordStrength {
        PasswordStrength::from_score(self.score)
    }
}

/// Validates a password and scores its strength.
///
/// Every section runs; a failing rule never hides a later one. The result
/// depends only on the password.
pub fn validate_password(password: &SecretString) -> PasswordValidationResult {
    let mut errors = Vec::new();
    let mut score: i32 = 0;

    // Orchestrator: execute sections in sequence
    let sections: [(&str, fn(&SecretString) -> SectionResult); 4] = [
        ("length", length_section),
        ("variety", character_variety_section),
        ("pattern", pattern_analysis_section),
        ("entropy", entropy_section),
    ];

    for (_section_name, section_fn) in sections {
        let SectionResult { reasons, score: delta } = section_fn(password);

        #[cfg(feature = "tracing")]
        tracing::trace!(
            section = _section_name,
            violations = reasons.len(),
            delta,
            "password section evaluated"
        );

        errors.extend(reasons);
        score += delta;
    }

    PasswordValidationResult {
        is_valid: errors.is_empty(),
        errors,
        score: score.clamp(0, MAX_SCORE) as u8,
    }
}

/// Async version that debounces, then sends the validation result via channel.
///
/// Nothing is sent if `token` is cancelled before the debounce elapses.
#[cfg(feature = "async")]
pub async fn validate_password_tx(
    password: &SecretString,
    token: CancellationToken,
    tx: mpsc::Sender<PasswordValidationResult>,
) {
    use std::time::Duration;

    #[cfg(feature = "tracing")]
    tracing::debug!("password validation is about to start...");

    tokio::select! {
        _ = token.cancelled() => {
            #[cfg(feature = "tracing")]
            tracing::debug!("password validation cancelled");
            return;
        }
        _ = tokio::time::sleep(Duration::from_millis(300)) => {}
    }

    let result = validate_password(password);

    if let Err(_e) = tx.send(result).await {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send password validation result: {}", _e);
    }
}
