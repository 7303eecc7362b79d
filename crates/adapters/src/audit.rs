// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Append-only JSON-lines audit record of every attempted action,
//! written by the Agent's Validator (spec §4.2 step 9).

use chrono::{DateTime, Utc};
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Mutex;

#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to open audit log at {path}: {source}")]
    Open { path: PathBuf, source: std::io::Error },
    #[error("failed to write audit record: {0}")]
    Write(#[from] std::io::Error),
}

#[derive(Debug, Clone, Serialize)]
pub struct AuditRecord {
    pub ts: DateTime<Utc>,
    pub action: String,
    pub params_digest: String,
    pub decision: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub returncode: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

impl AuditRecord {
    pub fn new(action: impl Into<String>, params: &serde_json::Value, decision: impl Into<String>, ts: DateTime<Utc>) -> Self {
        Self {
            ts,
            action: action.into(),
            params_digest: digest_params(params),
            decision: decision.into(),
            returncode: None,
            duration_ms: None,
        }
    }

    pub fn with_outcome(mut self, returncode: i32, duration_ms: u64) -> Self {
        self.returncode = Some(returncode);
        self.duration_ms = Some(duration_ms);
        self
    }
}

/// Parameters are never logged verbatim — a digest avoids leaking secrets
/// (e.g. commit messages, file contents) into a log file with looser
/// permissions than the store itself.
fn digest_params(params: &serde_json::Value) -> String {
    let mut hasher = Sha256::new();
    hasher.update(params.to_string().as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Append-only sink. Cheap to clone (shares the underlying file handle).
#[derive(Clone)]
pub struct AuditLog {
    file: Arc<Mutex<std::fs::File>>,
}

impl AuditLog {
    pub fn open(dir: &Path, file_name: &str) -> Result<Self, AuditError> {
        std::fs::create_dir_all(dir).map_err(|source| AuditError::Open { path: dir.to_path_buf(), source })?;
        let path = dir.join(file_name);
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| AuditError::Open { path: path.clone(), source })?;
        Ok(Self { file: Arc::new(Mutex::new(file)) })
    }

    pub async fn append(&self, record: &AuditRecord) -> Result<(), AuditError> {
        let line = serde_json::to_string(record).unwrap_or_else(|_| "{}".to_string());
        let mut file = self.file.lock().await;
        writeln!(file, "{line}")?;
        file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "audit_tests.rs"]
mod tests;
