// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! A thin pass-through user record for the chat front-end.
//!
//! Long-term-memory capture (facts, preferences, per-message audit trail)
//! is out of scope; only the identity fields the front-end needs to
//! address a user and greet them by name are kept here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub chat_user_id: i64,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub timezone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_seen_at: Option<DateTime<Utc>>,
}

impl UserProfile {
    pub fn new(chat_user_id: i64, now: DateTime<Utc>) -> Self {
        Self {
            id: None,
            chat_user_id,
            username: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            timezone: String::new(),
            created_at: now,
            updated_at: now,
            last_seen_at: None,
        }
    }

    pub fn touch_last_seen(&mut self, now: DateTime<Utc>) {
        self.last_seen_at = Some(now);
        self.updated_at = now;
    }

    pub fn display_name(&self) -> &str {
        if !self.first_name.is_empty() {
            &self.first_name
        } else if !self.username.is_empty() {
            &self.username
        } else {
            "there"
        }
    }
}

#[cfg(test)]
#[path = "user_profile_tests.rs"]
mod tests;
