//! In-memory fixed-window rate limiting keyed by client identifier.
//!
//! This is a best-effort, single-process mechanism: counters live in memory,
//! reset on restart and are not shared between instances. A multi-instance
//! deployment needs an external shared store instead.

use std::net::IpAddr;
use std::ops::Add;
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use http::StatusCode;

const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");
const X_RATELIMIT_RESET: HeaderName = HeaderName::from_static("x-ratelimit-reset");
const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Window length, request ceiling and rejection message for one limiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub window: Duration,
    pub max_requests: u32,
    pub message: &'static str,
}

impl RateLimitPolicy {
    pub const LOGIN: Self = Self {
        window: Duration::from_secs(15 * 60),
        max_requests: 5,
        message: "Too many login attempts. Please try again later.",
    };

    pub const API: Self = Self {
        window: Duration::from_secs(60),
        max_requests: 100,
        message: "Too many API requests. Please slow down.",
    };

    pub const REGISTRATION: Self = Self {
        window: Duration::from_secs(24 * 60 * 60),
        max_requests: 10,
        message: "Too many registration attempts. Please try again tomorrow.",
    };

    pub const PASSWORD_RESET: Self = Self {
        window: Duration::from_secs(60 * 60),
        max_requests: 3,
        message: "Too many password reset attempts. Please try again later.",
    };
}

/// A point in time on both the monotonic and the wall clock.
///
/// Windows are measured on the monotonic clock; the wall clock only feeds the
/// reported reset time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timestamp {
    pub monotonic: Instant,
    pub wall: SystemTime,
}

impl Timestamp {
    pub fn now() -> Self {
        Self {
            monotonic: Instant::now(),
            wall: SystemTime::now(),
        }
    }
}

impl Add<Duration> for Timestamp {
    type Output = Timestamp;

    fn add(self, rhs: Duration) -> Timestamp {
        Timestamp {
            monotonic: self.monotonic + rhs,
            wall: self.wall + rhs,
        }
    }
}

/// Counter for one key in the current window
#[derive(Debug, Clone, Copy)]
struct WindowEntry {
    count: u32,
    reset_at: Instant,
}

/// Outcome of [`RateLimitStore::check_and_consume`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited {
        /// Time until the window resets, rounded up to whole seconds.
        retry_after: Duration,
        /// Wall-clock instant the window resets.
        reset_at: SystemTime,
    },
}

/// Shared map from client key to its request counter.
#[derive(Debug, Default)]
pub struct RateLimitStore {
    entries: DashMap<String, WindowEntry>,
}

impl RateLimitStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts a request for `key` and reports whether it is allowed.
    pub fn check_and_consume(
        &self,
        key: &str,
        window: Duration,
        max_requests: u32,
    ) -> RateLimitDecision {
        self.check_and_consume_at(key, window, max_requests, Timestamp::now())
    }

    /// [`check_and_consume`](Self::check_and_consume) with an explicit clock.
    pub fn check_and_consume_at(
        &self,
        key: &str,
        window: Duration,
        max_requests: u32,
        now: Timestamp,
    ) -> RateLimitDecision {
        let Timestamp { monotonic: now, wall } = now;
        // Drop expired windows
        self.entries.retain(|_, entry| entry.reset_at >= now);

        // The shard lock is held until `entry` drops, so updates to one key never race.
        let mut entry = self.entries.entry(key.to_string()).or_insert(WindowEntry {
            count: 0,
            reset_at: now + window,
        });

        if entry.count >= max_requests {
            let remaining = entry.reset_at.saturating_duration_since(now);
            return RateLimitDecision::Limited {
                retry_after: ceil_to_secs(remaining),
                reset_at: wall + remaining,
            };
        }

        entry.count += 1;
        RateLimitDecision::Allowed
    }

    /// Number of keys currently tracked.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&self) {
        self.entries.clear();
    }
}

fn ceil_to_secs(d: Duration) -> Duration {
    let secs = d.as_secs() + u64::from(d.subsec_nanos() > 0);
    Duration::from_secs(secs)
}

/// Structured rejection returned once a client exceeds its policy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitRejection {
    pub limit: u32,
    pub retry_after: Duration,
    pub reset_at: SystemTime,
    pub message: &'static str,
}

impl RateLimitRejection {
    pub fn status(&self) -> StatusCode {
        StatusCode::TOO_MANY_REQUESTS
    }

    /// Window reset as milliseconds since the UNIX epoch.
    pub fn reset_epoch_millis(&self) -> u128 {
        self.reset_at
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or(0)
    }

    /// `Retry-After` and `X-RateLimit-*` response headers.
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, HeaderValue::from(self.retry_after.as_secs()));
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from_static("0"));
        headers.insert(
            X_RATELIMIT_RESET,
            HeaderValue::from(self.reset_epoch_millis() as u64),
        );
        headers
    }

    /// JSON response body.
    pub fn body(&self) -> serde_json::Value {
        serde_json::json!({
            "error": self.message,
            "retryAfter": self.retry_after.as_secs(),
        })
    }
}

impl std::fmt::Display for RateLimitRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (retry after {}s)", self.message, self.retry_after.as_secs())
    }
}

impl std::error::Error for RateLimitRejection {}

/// Applies one [`RateLimitPolicy`] against a [`RateLimitStore`].
#[derive(Debug, Clone)]
pub struct RateLimiter {
    store: Arc<RateLimitStore>,
    policy: RateLimitPolicy,
}

impl RateLimiter {
    /// Creates a limiter with its own private store.
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self::with_store(policy, Arc::new(RateLimitStore::new()))
    }

    /// Creates a limiter counting into a shared store.
    pub fn with_store(policy: RateLimitPolicy, store: Arc<RateLimitStore>) -> Self {
        Self { store, policy }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<RateLimitStore> {
        &self.store
    }

    /// Counts a request from `key`, rejecting it once the policy is exceeded.
    pub fn check(&self, key: &str) -> Result<(), RateLimitRejection> {
        self.check_at(key, Timestamp::now())
    }

    pub fn check_at(&self, key: &str, now: Timestamp) -> Result<(), RateLimitRejection> {
        match self
            .store
            .check_and_consume_at(key, self.policy.window, self.policy.max_requests, now)
        {
            RateLimitDecision::Allowed => Ok(()),
            RateLimitDecision::Limited {
                retry_after,
                reset_at,
            } => {
                #[cfg(feature = "tracing")]
                tracing::info!(
                    key,
                    limit = self.policy.max_requests,
                    retry_after_secs = retry_after.as_secs(),
                    "rate limit exceeded"
                );
                Err(RateLimitRejection {
                    limit: self.policy.max_requests,
                    retry_after,
                    reset_at,
                    message: self.policy.message,
                })
            }
        }
    }
}

/// Identifies a client: the peer address, then the first `x-forwarded-for`
/// entry, then `"unknown"`.
pub fn client_key(remote: Option<IpAddr>, headers: &HeaderMap) -> String {
    if let Some(ip) = remote {
        return ip.to_string();
    }
    headers
        .get(X_FORWARDED_FOR)
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or("unknown")
        .to_string()
}
