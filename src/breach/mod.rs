//! Breached-password lookup over the k-anonymity range protocol.
//!
//! A password's SHA-1 is split into a 5-character prefix and a suffix. Only the
//! prefix is sent; the service answers with every known suffix sharing it as
//! `SUFFIX:COUNT` lines, and membership is decided locally.
//!
//! All public checks fail open: when the service cannot be reached the
//! password is reported as not breached, so a third-party outage never blocks
//! sign-up or login. [`BreachChecker::try_check_breach`] exposes the failure
//! for callers that need to audit it.

mod checker;
mod source;

use std::collections::HashSet;
use thiserror::Error;

pub use checker::BreachChecker;
pub use source::{HttpRangeSource, RangeSource};

#[derive(Error, Debug)]
pub enum BreachError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("range request for prefix {prefix} failed: {source}")]
    Request {
        prefix: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("range service returned {status} for prefix {prefix}")]
    Status {
        prefix: String,
        status: reqwest::StatusCode,
    },
}

/// Outcome of a detailed breach check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BreachCheckResult {
    pub is_breached: bool,
    /// Times the password appears in the corpus, when known.
    pub breach_count: Option<u64>,
}

impl BreachCheckResult {
    pub const NOT_BREACHED: Self = Self {
        is_breached: false,
        breach_count: None,
    };
}

/// Splits a response line into `(suffix, count)`.
fn split_line(line: &str) -> (&str, Option<&str>) {
    match line.split_once(':') {
        Some((suffix, count)) => (suffix.trim(), Some(count.trim())),
        None => (line.trim(), None),
    }
}

/// Looks up `suffix` in a range response body.
fn find_suffix(body: &str, suffix: &str) -> Option<BreachCheckResult> {
    body.lines()
        .map(split_line)
        .find(|(candidate, _)| *candidate == suffix)
        .map(|(_, count)| BreachCheckResult {
            is_breached: true,
            breach_count: count.and_then(|c| c.parse().ok()),
        })
}

/// Every suffix listed in a range response body.
fn suffix_set(body: &str) -> HashSet<&str> {
    body.lines()
        .map(|line| split_line(line).0)
        .filter(|suffix| !suffix.is_empty())
        .collect()
}
