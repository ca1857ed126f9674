//! Retry policies for idempotent requests.
//!
//! The engine never retries on its own: the default policy is
//! [`RetryPolicy::None`]. A policy only ever applies to GET requests, so a
//! state-changing call (order placement, transfers) is sent at most once.

use std::time::Duration;

use crate::api::error::{ApiError, TransportError};

/// Retry policy for a client.
#[derive(Debug, Clone, Default)]
pub enum RetryPolicy {
    /// No retries.
    #[default]
    None,
    /// Retry on transport failures, rate limits and 502/503/504.
    Idempotent,
    /// User-provided retry configuration.
    Custom(RetryConfig),
}

impl RetryPolicy {
    /// Resolve the policy into a concrete config, if retries are enabled.
    pub fn config(&self) -> Option<RetryConfig> {
        match self {
            RetryPolicy::None => None,
            RetryPolicy::Idempotent => Some(RetryConfig::idempotent()),
            RetryPolicy::Custom(c) => Some(c.clone()),
        }
    }
}

/// Configuration for retry behavior.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not counting the initial request).
    pub max_retries: u32,
    /// Initial delay before the first retry.
    pub initial_delay: Duration,
    /// Maximum delay between retries.
    pub max_delay: Duration,
    /// Multiplier applied to the delay after each retry.
    pub backoff_factor: f64,
    /// Whether to add jitter to the delay.
    pub jitter: bool,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::idempotent()
    }
}

impl RetryConfig {
    /// The default config for idempotent (GET) requests.
    pub fn idempotent() -> Self {
        Self {
            max_retries: 3,
            initial_delay: Duration::from_millis(200),
            max_delay: Duration::from_secs(10),
            backoff_factor: 2.0,
            jitter: true,
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }

    /// Create a config with the given number of retries and defaults otherwise.
    pub fn new(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::idempotent()
        }
    }

    /// Whether `error` is worth another attempt under this config.
    ///
    /// A rate limit whose `Retry-After` exceeds `max_delay` is returned to the
    /// caller instead of being waited out.
    pub fn should_retry(&self, error: &ApiError) -> bool {
        match error {
            ApiError::Transport(TransportError::Timeout | TransportError::Connect(_)) => true,
            ApiError::RateLimited {
                retry_after: Some(hint),
                ..
            } if *hint > self.max_delay => false,
            ApiError::RateLimited { status, .. } | ApiError::Http { status, .. } => {
                self.retryable_statuses.contains(status)
            }
            _ => false,
        }
    }

    /// Calculate delay for a given attempt (0-indexed).
    ///
    /// A rate-limit `Retry-After` hint takes precedence when it is longer,
    /// bounded by `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32, error: &ApiError) -> Duration {
        let base =
            self.initial_delay.as_millis() as f64 * self.backoff_factor.powi(attempt as i32);
        let capped = base.min(self.max_delay.as_millis() as f64);

        let final_ms = if self.jitter {
            let jitter_range = capped * 0.25;
            let jitter = (rand::random::<f64>() - 0.5) * 2.0 * jitter_range;
            (capped + jitter).max(0.0)
        } else {
            capped
        };

        let delay = Duration::from_millis(final_ms as u64);
        match error {
            ApiError::RateLimited {
                retry_after: Some(hint),
                ..
            } => delay.max(*hint).min(self.max_delay),
            _ => delay,
        }
    }
}
