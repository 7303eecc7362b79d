// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Sliding-window rate limiter for inbound action requests: a
//! configurable number of requests per rolling 60s window.

use parking_lot::Mutex;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(60);

pub struct RateLimiter {
    limit: u32,
    timestamps: Mutex<VecDeque<Instant>>,
}

impl RateLimiter {
    pub fn new(limit: u32) -> Self {
        Self { limit, timestamps: Mutex::new(VecDeque::new()) }
    }

    /// Records one request attempt at `now` and returns whether it is
    /// within the limit. Always records, even when rejecting, so the
    /// window itself is unaffected by whether the caller proceeds.
    pub fn check(&self, now: Instant) -> bool {
        let mut timestamps = self.timestamps.lock();
        while let Some(&front) = timestamps.front() {
            if now.duration_since(front) > WINDOW {
                timestamps.pop_front();
            } else {
                break;
            }
        }
        if timestamps.len() as u32 >= self.limit {
            return false;
        }
        timestamps.push_back(now);
        true
    }
}

#[cfg(test)]
#[path = "rate_limit_tests.rs"]
mod tests;
