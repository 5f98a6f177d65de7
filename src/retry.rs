//! Retry policy and the delay primitive it sleeps with

use std::time::Duration;
use async_trait::async_trait;
use log::debug;
use crate::config::RetryConfig;

/// Bounded exponential retry: `base * 2^attempt`, no jitter, no cap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy
{   pub max_attempts: usize
  , pub base_delay: Duration
}

impl RetryPolicy
{   /// Create a new retry policy
    pub fn new(
      max_attempts: usize
    , base_delay_ms: u64
    ) -> Self
    {   RetryPolicy
        {   max_attempts
          , base_delay: Duration::from_millis(base_delay_ms)
        }
    }

    /// Delay to wait after failed attempt number `attempt` (0-based)
    pub fn backoff_for_attempt(
      &self
    , attempt: usize
    ) -> Duration
    {   debug!("Calculating backoff for attempt {}", attempt);
        let factor = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(factor)
    }

    /// Whether another attempt may follow attempt `attempt` (0-based)
    pub fn has_next(&self, attempt: usize) -> bool
    {   attempt + 1 < self.max_attempts
    }
}

impl Default for RetryPolicy
{   fn default() -> Self
    {   RetryPolicy::from(&RetryConfig::default())
    }
}

impl From<&RetryConfig> for RetryPolicy
{   fn from(config: &RetryConfig) -> Self
    {   RetryPolicy::new(config.max_attempts, config.base_delay_ms)
    }
}

/// Blocking-delay seam so tests can observe the backoff schedule
#[async_trait]
pub trait Sleeper: Send + Sync
{   async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper
{   async fn sleep(&self, duration: Duration)
    {   tokio::time::sleep(duration).await
    }
}
