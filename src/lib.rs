//! Password policy and abuse-protection utilities
//!
//! This library provides three independent components:
//!
//! - a rule-based password validator with a 0-100 strength score,
//! - a breached-password checker using the k-anonymity range protocol,
//! - an in-memory, per-client rate limiter.
//!
//! # Features
//!
//! - `async` (default): Enables the breach checker and channel-based validation
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! See [`config`] for the variables read by [`BreachConfig::from_env`].
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_guard::{validate_password, RateLimitPolicy, RateLimiter};
//! use secrecy::SecretString;
//!
//! let password = SecretString::new("MyStr0ng!P@ssw0rd2024".to_string().into());
//! let result = validate_password(&password);
//! println!("Valid: {} ({})", result.is_valid, result.strength());
//!
//! let limiter = RateLimiter::new(RateLimitPolicy::LOGIN);
//! if let Err(rejection) = limiter.check("203.0.113.7") {
//!     println!("{}", rejection);
//! }
//! ```
//!
//! ```rust,no_run
//! # #[cfg(feature = "async")]
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use pwd_guard::{BreachChecker, BreachConfig};
//! use secrecy::SecretString;
//!
//! let checker = BreachChecker::from_config(BreachConfig::from_env()?)?;
//! let password = SecretString::new("hunter2".to_string().into());
//! if checker.is_breached(&password).await {
//!     println!("Choose another password");
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod digest;
pub mod rate_limit;

#[cfg(feature = "async")]
pub mod breach;

// Internal modules
mod evaluator;
mod sections;
mod strength;

// Public API
pub use config::{BreachConfig, ConfigError};
pub use digest::HashPrefix;
pub use evaluator::{validate_password, PasswordValidationResult};
pub use rate_limit::{
    client_key, RateLimitDecision, RateLimitPolicy, RateLimitRejection, RateLimitStore, Timestamp,
    RateLimiter,
};
pub use sections::entropy_bits;
pub use strength::{strength_label, PasswordStrength};

#[cfg(feature = "async")]
pub use breach::{BreachCheckResult, BreachChecker, BreachError, HttpRangeSource, RangeSource};

#[cfg(feature = "async")]
pub use evaluator::validate_password_tx;
