// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Per-provider daily quota accounting, keyed by `(provider_name, date)`.
//! Increments are serialized by the Router via a per-provider critical
//! section so counters cannot lose updates under concurrent task calls.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderUsage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub provider_name: String,
    pub date: NaiveDate,
    pub requests_used: u32,
    pub tokens_used: u64,
    pub errors: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_request_at: Option<DateTime<Utc>>,
}

impl ProviderUsage {
    pub fn new(provider_name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            id: None,
            provider_name: provider_name.into(),
            date,
            requests_used: 0,
            tokens_used: 0,
            errors: 0,
            last_request_at: None,
        }
    }

    pub fn record_request(&mut self, tokens: u64, now: DateTime<Utc>) {
        self.requests_used += 1;
        self.tokens_used += tokens;
        self.last_request_at = Some(now);
    }

    pub fn record_error(&mut self, now: DateTime<Utc>) {
        self.errors += 1;
        self.last_request_at = Some(now);
    }

    /// Whether this usage row has hit the given per-day request cap.
    pub fn is_exhausted(&self, daily_request_cap: u32) -> bool {
        self.requests_used >= daily_request_cap
    }
}

#[cfg(test)]
#[path = "provider_usage_tests.rs"]
mod tests;
