//! Rate limiter for preventing brute force login attempts

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::info;

/// Rate limiter configuration
#[derive(Debug, Clone)]
pub struct RateLimiterConfig {
    /// Maximum number of attempts allowed inside the window
    pub max_attempts: u32,
    /// Time window in seconds
    pub window_seconds: u64,
    /// Ban duration in seconds once the limit is exceeded
    pub ban_duration_seconds: u64,
}

impl Default for RateLimiterConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            window_seconds: 300,        // 5 minutes
            ban_duration_seconds: 1800, // 30 minutes
        }
    }
}

#[derive(Debug)]
struct RateLimiterEntry {
    attempts: u32,
    last_attempt: Instant,
    ban_expires: Option<Instant>,
}

/// In-memory rate limiter keyed by an arbitrary string (login email here)
#[derive(Debug, Clone)]
pub struct RateLimiter {
    config: RateLimiterConfig,
    entries: Arc<Mutex<HashMap<String, RateLimiterEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: RateLimiterConfig) -> Self {
        Self {
            config,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for the key and decide whether it is allowed
    pub async fn is_allowed(&self, key: &str) -> bool {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let entry = entries.entry(key.to_string()).or_insert(RateLimiterEntry {
            attempts: 0,
            last_attempt: now,
            ban_expires: None,
        });

        if let Some(ban_expires) = entry.ban_expires {
            if now >= ban_expires {
                entry.attempts = 0;
                entry.ban_expires = None;
            } else {
                return false;
            }
        }

        if now.duration_since(entry.last_attempt) >= Duration::from_secs(self.config.window_seconds)
        {
            entry.attempts = 0;
        }

        if entry.attempts >= self.config.max_attempts {
            entry.ban_expires = Some(now + Duration::from_secs(self.config.ban_duration_seconds));
            info!(
                "Banned key {} for {} seconds",
                key, self.config.ban_duration_seconds
            );
            return false;
        }

        entry.attempts += 1;
        entry.last_attempt = now;

        true
    }

    /// Forget a key after a successful attempt
    pub async fn reset(&self, key: &str) {
        self.entries.lock().await.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter(max_attempts: u32) -> RateLimiter {
        RateLimiter::new(RateLimiterConfig {
            max_attempts,
            window_seconds: 60,
            ban_duration_seconds: 60,
        })
    }

    #[tokio::test]
    async fn allows_up_to_the_limit_then_bans() {
        let limiter = limiter(3);

        for _ in 0..3 {
            assert!(limiter.is_allowed("ana@kiosk.example").await);
        }
        assert!(!limiter.is_allowed("ana@kiosk.example").await);
        assert!(!limiter.is_allowed("ana@kiosk.example").await);
    }

    #[tokio::test]
    async fn keys_are_tracked_independently() {
        let limiter = limiter(1);

        assert!(limiter.is_allowed("ana@kiosk.example").await);
        assert!(!limiter.is_allowed("ana@kiosk.example").await);
        assert!(limiter.is_allowed("luis@kiosk.example").await);
    }

    #[tokio::test]
    async fn reset_clears_the_counter() {
        let limiter = limiter(1);

        assert!(limiter.is_allowed("ana@kiosk.example").await);
        assert!(!limiter.is_allowed("ana@kiosk.example").await);

        limiter.reset("ana@kiosk.example").await;
        assert!(limiter.is_allowed("ana@kiosk.example").await);
    }
}
