// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Environment-variable configuration for the Agent process, mirroring
//! the Gateway's own `config.rs` (itself grounded on the teacher's
//! `daemon/src/env.rs`): one typed getter per variable, fail fast on
//! anything the process cannot run without.

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Everything the Agent binary needs to start, resolved once at boot.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub auth_token: String,
    pub gateway_url: String,
    pub project_dir: PathBuf,
    pub allowed_roots: Vec<PathBuf>,
    pub rate_limit_per_minute: u32,
    pub initial_emergency_stop: bool,
    pub default_timeout: Duration,
    pub log_level: String,
    pub audit_log_dir: PathBuf,
    pub audit_log_file: String,
}

impl AgentConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let project_dir = path_or("PROJECT_DIR", ".");
        Ok(Self {
            auth_token: required("AUTH_TOKEN")?,
            gateway_url: required("GATEWAY_URL")?,
            allowed_roots: allowed_roots_from_env(&project_dir)?,
            project_dir,
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 30)?,
            initial_emergency_stop: bool_or("EMERGENCY_STOP", false)?,
            default_timeout: Duration::from_secs(parse_or("DEFAULT_TIMEOUT_SECS", 120u64)?),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            audit_log_dir: path_or("AUDIT_LOG_DIR", "."),
            audit_log_file: std::env::var("AUDIT_LOG_FILE").unwrap_or_else(|_| "audit.jsonl".to_string()),
        })
    }
}

fn required(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).ok().filter(|s| !s.is_empty()).ok_or(ConfigError::Missing(name))
}

fn parse_or<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw }),
        Err(_) => Ok(default),
    }
}

fn bool_or(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => match raw.as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::Invalid { name, value: raw }),
        },
        Err(_) => Ok(default),
    }
}

fn path_or(name: &'static str, default: &str) -> PathBuf {
    std::env::var(name).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

/// `ALLOWED_ROOTS` is a `:`-separated list of directories the path jail
/// permits; defaults to just the project directory itself when unset.
fn allowed_roots_from_env(project_dir: &std::path::Path) -> Result<Vec<PathBuf>, ConfigError> {
    match std::env::var("ALLOWED_ROOTS") {
        Ok(raw) if !raw.is_empty() => Ok(raw.split(':').map(PathBuf::from).collect()),
        _ => Ok(vec![project_dir.to_path_buf()]),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
