// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Idempotency keys for action dispatch.
//!
//! Every dispatch the Worker makes is keyed by `(task_id, idempotency_key)`;
//! the Gateway checks `action_idempotency` before forwarding to the channel
//! and replays the cached response on a retry instead of re-executing.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A canonicalized `sha256(tool_name + "\0" + canonical_json(params))` digest,
/// scoped to a task by the caller (the `(task_id, key)` pair is the actual
/// cache key — this type only covers the tool-invocation half).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdempotencyKey(pub String);

impl IdempotencyKey {
    /// Derives a key from an action name and its parameters. `params` must
    /// already be in a canonical form (stable key ordering) — callers pass
    /// `serde_json::to_value` output through `serde_json::Value`'s `Map`,
    /// which serializes keys in insertion order, so the caller is
    /// responsible for sorting if order-independence is required.
    pub fn derive(action_name: &str, params: &serde_json::Value) -> Self {
        let canonical = format!("{action_name}\0{params}");
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(format!("{:x}", hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for IdempotencyKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A cached dispatch outcome, stored so a retried request with the same
/// `(task_id, idempotency_key)` replays the prior response verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdempotencyRecord {
    pub task_id: String,
    pub idempotency_key: IdempotencyKey,
    pub response_json: serde_json::Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
#[path = "idempotency_tests.rs"]
mod tests;
