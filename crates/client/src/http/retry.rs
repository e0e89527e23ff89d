// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Retry policy for transient request failures.

use std::time::Duration;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Exponential backoff with a cap and additive jitter.
///
/// The delay before retry `n` (1-based) is `min(base * 2^(n-1), max)` plus a
/// random extra of up to `jitter` of that value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
    /// Fraction of the delay added at random, in `0.0..=1.0`.
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: 3,
            base_delay_ms: 1000,
            max_delay_ms: 10_000,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries.
    pub fn none() -> Self {
        RetryPolicy {
            max_retries: 0,
            ..RetryPolicy::default()
        }
    }

    /// Total attempts a request may make, including the first.
    pub fn max_attempts(&self) -> u32 {
        self.max_retries.saturating_add(1)
    }

    /// Delay before retry `retry` without jitter.
    pub fn base_delay(&self, retry: u32) -> Duration {
        let exponent = retry.saturating_sub(1);
        let factor = 1u64.checked_shl(exponent).unwrap_or(u64::MAX);
        let ms = self.base_delay_ms.saturating_mul(factor);
        Duration::from_millis(ms.min(self.max_delay_ms))
    }

    /// Delay before retry `retry` with jitter `unit` in `0.0..1.0`.
    pub fn delay_with_jitter(&self, retry: u32, unit: f64) -> Duration {
        let base = self.base_delay(retry);
        let extra = base.as_nanos() as f64 * self.jitter * unit.clamp(0.0, 1.0);
        base + Duration::from_nanos(extra.round() as u64)
    }

    /// Delay before retry `retry` with random jitter.
    pub fn delay(&self, retry: u32) -> Duration {
        let unit = rand::thread_rng().gen::<f64>();
        self.delay_with_jitter(retry, unit)
    }
}

/// HTTP statuses that are retried: rate limiting and internal server errors.
pub fn is_retryable_status(status: u16) -> bool {
    matches!(status, 429 | 500)
}

#[cfg(test)]
#[path = "retry_tests.rs"]
mod tests;
