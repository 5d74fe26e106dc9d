//! Single, detailed and batch breach checks.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;

use super::{find_suffix, suffix_set, BreachCheckResult, BreachError, HttpRangeSource, RangeSource};
use crate::config::{BreachConfig, DEFAULT_BATCH_DELAY};
use crate::digest::HashPrefix;

/// Checks passwords against a breach corpus through a [`RangeSource`].
#[derive(Debug, Clone)]
pub struct BreachChecker<S = HttpRangeSource> {
    source: S,
    batch_delay: Duration,
}

impl BreachChecker<HttpRangeSource> {
    /// Creates a checker talking HTTP with the given configuration.
    pub fn from_config(config: BreachConfig) -> Result<Self, BreachError> {
        let batch_delay = config.batch_delay;
        Ok(Self::new(HttpRangeSource::new(config)?).with_batch_delay(batch_delay))
    }
}

impl<S: RangeSource> BreachChecker<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            batch_delay: DEFAULT_BATCH_DELAY,
        }
    }

    /// Sets the pause between successive prefix requests in a batch.
    pub fn with_batch_delay(mut self, batch_delay: Duration) -> Self {
        self.batch_delay = batch_delay;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Detailed check that surfaces service failures instead of failing open.
    pub async fn try_check_breach(
        &self,
        password: &SecretString,
    ) -> Result<BreachCheckResult, BreachError> {
        let hash = HashPrefix::of(password);
        let body = self.source.fetch_range(hash.prefix()).await?;
        Ok(find_suffix(&body, hash.suffix()).unwrap_or(BreachCheckResult::NOT_BREACHED))
    }

    /// Detailed check. Any failure is reported as not breached.
    pub async fn check_breach(&self, password: &SecretString) -> BreachCheckResult {
        match self.try_check_breach(password).await {
            Ok(result) => result,
            Err(_e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("breach check failed, treating as not breached: {}", _e);
                BreachCheckResult::NOT_BREACHED
            }
        }
    }

    /// Returns `true` iff the password is listed in the corpus.
    /// Any failure is reported as `false`.
    pub async fn is_breached(&self, password: &SecretString) -> bool {
        self.check_breach(password).await.is_breached
    }

    /// Checks many passwords with one request per distinct hash prefix.
    ///
    /// The returned map has one entry per distinct input password. A failed
    /// request marks only the passwords of its own prefix as not breached.
    pub async fn batch_check(&self, passwords: &[SecretString]) -> HashMap<String, bool> {
        self.batch_check_with_token(passwords, None).await
    }

    /// Like [`batch_check`](Self::batch_check), but stops querying once
    /// `token` is cancelled. Passwords in groups that were never queried are
    /// reported as not breached.
    pub async fn batch_check_with_token(
        &self,
        passwords: &[SecretString],
        token: Option<CancellationToken>,
    ) -> HashMap<String, bool> {
        // Group passwords by hash prefix to minimize requests
        let mut groups: BTreeMap<String, Vec<(&str, HashPrefix)>> = BTreeMap::new();
        for password in passwords {
            let pwd = password.expose_secret();
            let hash = HashPrefix::of_str(pwd);
            groups
                .entry(hash.prefix().to_string())
                .or_default()
                .push((pwd, hash));
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            passwords = passwords.len(),
            prefixes = groups.len(),
            "starting batch breach check"
        );

        let mut results = HashMap::with_capacity(passwords.len());
        let mut cancelled = false;

        for (index, (prefix, members)) in groups.iter().enumerate() {
            if index > 0 && !cancelled {
                cancelled = self.pause(token.as_ref()).await;
            }
            cancelled = cancelled || token.as_ref().is_some_and(|t| t.is_cancelled());

            let body = if cancelled {
                None
            } else {
                match self.source.fetch_range(prefix).await {
                    Ok(body) => Some(body),
                    Err(_e) => {
                        #[cfg(feature = "tracing")]
                        tracing::warn!("batch check failed for prefix {}: {}", prefix, _e);
                        None
                    }
                }
            };

            let breached: HashSet<&str> = body.as_deref().map(suffix_set).unwrap_or_default();
            for (pwd, hash) in members {
                results.insert(pwd.to_string(), breached.contains(hash.suffix()));
            }
        }

        #[cfg(feature = "tracing")]
        if cancelled {
            tracing::info!("batch breach check cancelled before completion");
        }

        results
    }

    /// Sleeps for the batch delay. Returns `true` if cancelled meanwhile.
    async fn pause(&self, token: Option<&CancellationToken>) -> bool {
        let sleep = tokio::time::sleep(self.batch_delay);
        match token {
            Some(token) => tokio::select! {
                _ = token.cancelled() => true,
                _ = sleep => false,
            },
            None => {
                sleep.await;
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// In-memory range service that records every prefix it is asked for.
    #[derive(Default)]
    struct FakeRangeSource {
        bodies: HashMap<String, String>,
        failing: HashSet<String>,
        calls: Mutex<Vec<String>>,
    }

    impl FakeRangeSource {
        fn with_breached(passwords: &[(&str, u64)]) -> Self {
            let mut source = Self::default();
            for (pwd, count) in passwords {
                source.add_breached(pwd, *count);
            }
            source
        }

        fn add_breached(&mut self, pwd: &str, count: u64) {
            let hash = HashPrefix::of_str(pwd);
            let body = self.bodies.entry(hash.prefix().to_string()).or_default();
            body.push_str(&format!("{}:{}\r\n", hash.suffix(), count));
        }

        fn fail_prefix_of(mut self, pwd: &str) -> Self {
            self.failing.insert(HashPrefix::of_str(pwd).prefix().to_string());
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl RangeSource for FakeRangeSource {
        async fn fetch_range(&self, prefix: &str) -> Result<String, BreachError> {
            self.calls.lock().unwrap().push(prefix.to_string());
            if self.failing.contains(prefix) {
                return Err(BreachError::Status {
                    prefix: prefix.to_string(),
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                });
            }
            // Unrelated padding entry so bodies are never empty
            let mut body = "00000000000000000000000000000000000:0\r\n".to_string();
            if let Some(listed) = self.bodies.get(prefix) {
                body.push_str(listed);
            }
            Ok(body)
        }
    }

    fn secret(s: &str) -> SecretString {
        SecretString::new(s.to_string().into())
    }

    fn secrets(list: &[&str]) -> Vec<SecretString> {
        list.iter().map(|s| secret(s)).collect()
    }

    /// Finds two distinct passwords whose hashes share a prefix.
    fn prefix_collision() -> (String, String) {
        let mut seen: HashMap<String, String> = HashMap::new();
        for i in 0.. {
            let candidate = format!("collide-{}", i);
            let prefix = HashPrefix::of_str(&candidate).prefix().to_string();
            if let Some(other) = seen.insert(prefix, candidate.clone()) {
                return (other, candidate);
            }
        }
        unreachable!()
    }

    #[tokio::test]
    async fn test_is_breached_true() {
        let checker = BreachChecker::new(FakeRangeSource::with_breached(&[("password", 42)]));
        assert!(checker.is_breached(&secret("password")).await);
        assert_eq!(checker.source().calls(), vec!["5BAA6".to_string()]);
    }

    #[tokio::test]
    async fn test_is_breached_false() {
        let checker = BreachChecker::new(FakeRangeSource::with_breached(&[("password", 42)]));
        assert!(!checker.is_breached(&secret("MyStr0ng!P@ssw0rd2024")).await);
    }

    #[tokio::test]
    async fn test_check_breach_returns_count() {
        let checker = BreachChecker::new(FakeRangeSource::with_breached(&[("hunter2", 17043)]));
        let result = checker.check_breach(&secret("hunter2")).await;
        assert_eq!(
            result,
            BreachCheckResult {
                is_breached: true,
                breach_count: Some(17043),
            }
        );
    }

    #[tokio::test]
    async fn test_check_breach_fails_open() {
        let source = FakeRangeSource::with_breached(&[("password", 42)]).fail_prefix_of("password");
        let checker = BreachChecker::new(source);

        assert_eq!(
            checker.check_breach(&secret("password")).await,
            BreachCheckResult::NOT_BREACHED
        );
        assert!(!checker.is_breached(&secret("password")).await);
    }

    #[tokio::test]
    async fn test_try_check_breach_surfaces_failure() {
        let source = FakeRangeSource::default().fail_prefix_of("password");
        let checker = BreachChecker::new(source);

        let result = checker.try_check_breach(&secret("password")).await;
        assert!(matches!(result, Err(BreachError::Status { .. })));
    }

    #[tokio::test]
    async fn test_is_breached_unreachable_service_returns_false() {
        let config = BreachConfig::default()
            .with_base_url("http://127.0.0.1:9")
            .with_timeout(Duration::from_secs(2));
        let checker = BreachChecker::from_config(config).expect("client should build");

        assert!(!checker.is_breached(&secret("password")).await);
        assert_eq!(
            checker.check_breach(&secret("password")).await,
            BreachCheckResult::NOT_BREACHED
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_check_one_request_per_prefix() {
        let (first, second) = prefix_collision();
        let source = FakeRangeSource::with_breached(&[(first.as_str(), 3), ("password", 9)]);
        let checker = BreachChecker::new(source);

        let input = secrets(&[first.as_str(), second.as_str(), "password", "password", "Zx9!mQ2#vL7$"]);
        let results = checker.batch_check(&input).await;

        let calls = checker.source().calls();
        let distinct: HashSet<&String> = calls.iter().collect();
        assert_eq!(calls.len(), 3);
        assert_eq!(distinct.len(), 3);

        assert_eq!(results.len(), 4);
        assert!(results[&first]);
        assert!(!results[&second]);
        assert!(results["password"]);
        assert!(!results["Zx9!mQ2#vL7$"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_check_failure_is_per_group() {
        let source = FakeRangeSource::with_breached(&[("password", 1), ("qwerty", 1)])
            .fail_prefix_of("password");
        let checker = BreachChecker::new(source);

        let results = checker.batch_check(&secrets(&["password", "qwerty"])).await;
        assert_eq!(results.len(), 2);
        assert!(!results["password"]);
        assert!(results["qwerty"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_check_delays_between_groups_only() {
        let checker = BreachChecker::new(FakeRangeSource::default())
            .with_batch_delay(Duration::from_millis(100));

        let start = tokio::time::Instant::now();
        checker.batch_check(&secrets(&["one", "two", "three"])).await;
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(200), "elapsed {:?}", elapsed);
        assert!(elapsed < Duration::from_millis(300), "elapsed {:?}", elapsed);

        let start = tokio::time::Instant::now();
        checker.batch_check(&secrets(&["one", "one", "one"])).await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_check_empty_input() {
        let checker = BreachChecker::new(FakeRangeSource::default());
        let results = checker.batch_check(&[]).await;
        assert!(results.is_empty());
        assert!(checker.source().calls().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_batch_check_cancelled_marks_rest_not_breached() {
        let checker = BreachChecker::new(FakeRangeSource::with_breached(&[("password", 5)]));
        let token = CancellationToken::new();
        token.cancel();

        let results = checker
            .batch_check_with_token(&secrets(&["password", "qwerty"]), Some(token))
            .await;

        assert!(checker.source().calls().is_empty());
        assert_eq!(results.len(), 2);
        assert!(results.values().all(|breached| !breached));
    }
}
