//! Password evaluation sections
//!
//! Each section analyzes a specific aspect of password strength and reports
//! the rules it violated together with the score it contributes.

mod entropy;
mod length;
mod pattern;
mod variety;

pub use entropy::{entropy_bits, entropy_section};
pub use length::length_section;
pub use pattern::pattern_analysis_section;
pub use variety::character_variety_section;

/// Outcome of a single section.
/// - `reasons` - Rule-violation messages, in check order
/// - `score` - Score delta contributed by the section (may be negative)
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SectionResult {
    pub reasons: Vec<String>,
    pub score: i32,
}

impl SectionResult {
    pub(crate) fn fail(&mut self, reason: impl Into<String>) {
        self.reasons.push(reason.into());
    }

    pub(crate) fn add(&mut self, delta: i32) {
        self.score += delta;
    }
}
