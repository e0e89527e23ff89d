// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use yare::parameterized;

#[parameterized(
    first = { 1, 1000 },
    second = { 2, 2000 },
    third = { 3, 4000 },
    fourth = { 4, 8000 },
    capped = { 5, 10_000 },
    far_out = { 40, 10_000 },
    huge = { u32::MAX, 10_000 },
)]
fn base_delay_doubles_up_to_cap(retry: u32, expected_ms: u64) {
    let policy = RetryPolicy::default();
    assert_eq!(policy.base_delay(retry), Duration::from_millis(expected_ms));
}

#[test]
fn jitter_adds_at_most_ten_percent() {
    let policy = RetryPolicy::default();
    assert_eq!(
        policy.delay_with_jitter(1, 0.0),
        Duration::from_millis(1000)
    );
    assert_eq!(
        policy.delay_with_jitter(1, 1.0),
        Duration::from_millis(1100)
    );
    assert_eq!(
        policy.delay_with_jitter(5, 1.0),
        Duration::from_millis(11_000)
    );
}

#[test]
fn random_delay_stays_in_bounds() {
    let policy = RetryPolicy::default();
    for retry in 1..=6 {
        let base = policy.base_delay(retry);
        for _ in 0..50 {
            let delay = policy.delay(retry);
            assert!(delay >= base);
            assert!(delay <= base + base / 10);
        }
    }
}

#[test]
fn default_allows_four_attempts() {
    assert_eq!(RetryPolicy::default().max_attempts(), 4);
    assert_eq!(RetryPolicy::none().max_attempts(), 1);
}

#[parameterized(
    too_many_requests = { 429, true },
    internal = { 500, true },
    bad_gateway = { 502, false },
    unavailable = { 503, false },
    bad_request = { 400, false },
    unauthorized = { 401, false },
    not_found = { 404, false },
)]
fn retryable_statuses(status: u16, expected: bool) {
    assert_eq!(is_retryable_status(status), expected);
}
