// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2026 Crewline Contributors

//! Environment-variable configuration for the Gateway process, mirroring
//! the teacher's `daemon/src/env.rs` centralized-lookup shape: one typed
//! getter per variable, documented fallback, fail fast on anything the
//! process cannot run without.

use std::net::SocketAddr;
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

/// Everything the Gateway binary needs to start, resolved once at boot.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Bearer token the Local Execution Agent must present on the channel.
    pub auth_token: String,
    /// Loopback control-plane HTTP bind address (`/action`, `/status`, ...).
    pub control_plane_addr: SocketAddr,
    /// Action Dispatch Channel WebSocket bind address.
    pub channel_addr: SocketAddr,
    pub store_path: PathBuf,
    pub rate_limit_per_minute: u32,
    pub log_level: String,
    pub audit_log_dir: PathBuf,
    pub audit_log_file: String,
    pub fallback_timeout: Duration,
    pub ssh_fallback: Option<SshFallbackConfig>,
    pub providers: Vec<ProviderConfig>,
    pub tls: Option<TlsConfig>,
}

#[derive(Debug, Clone)]
pub struct SshFallbackConfig {
    pub user: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

/// One configured LLM provider, read from the `PROVIDERS` list (spec
/// §4.3): `name:model:class:context_window:endpoint:api_key_env[:daily_limit]`.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub name: String,
    pub model: String,
    pub class: crew_engine::provider::ProviderClass,
    pub context_window: u32,
    pub endpoint: String,
    pub api_key: String,
    pub daily_request_limit: Option<u32>,
}

impl GatewayConfig {
    /// Resolves the full configuration from the process environment,
    /// failing fast (spec §6, "exit codes": `1` on missing required
    /// config) rather than starting with a partially-usable Gateway.
    pub fn from_env() -> Result<Self, ConfigError> {
        let auth_token = required("AUTH_TOKEN")?;

        Ok(Self {
            auth_token,
            control_plane_addr: socket_addr("CONTROL_PLANE_ADDR", "127.0.0.1:8088")?,
            channel_addr: socket_addr("CHANNEL_ADDR", "0.0.0.0:8089")?,
            store_path: path_or("STORE_PATH", "crewline.sqlite3"),
            rate_limit_per_minute: parse_or("RATE_LIMIT_PER_MINUTE", 30)?,
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            audit_log_dir: path_or("AUDIT_LOG_DIR", "."),
            audit_log_file: std::env::var("AUDIT_LOG_FILE").unwrap_or_else(|_| "audit.jsonl".to_string()),
            fallback_timeout: Duration::from_secs(parse_or("FALLBACK_TIMEOUT_SECS", 30u64)?),
            ssh_fallback: ssh_fallback_from_env()?,
            providers: providers_from_env()?,
            tls: tls_from_env()?,
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

fn path_or(name: &'static str, default: &str) -> PathBuf {
    std::env::var(name).map(PathBuf::from).unwrap_or_else(|_| PathBuf::from(default))
}

fn socket_addr(name: &'static str, default: &str) -> Result<SocketAddr, ConfigError> {
    let raw = std::env::var(name).unwrap_or_else(|_| default.to_string());
    raw.parse().map_err(|_| ConfigError::Invalid { name, value: raw })
}

fn ssh_fallback_from_env() -> Result<Option<SshFallbackConfig>, ConfigError> {
    let Ok(target) = std::env::var("SSH_FALLBACK_TARGET") else { return Ok(None) };
    let (user_host, port) = match target.rsplit_once(':') {
        Some((uh, port)) => (uh, port.parse().map_err(|_| ConfigError::Invalid { name: "SSH_FALLBACK_TARGET", value: target.clone() })?),
        None => (target.as_str(), 22u16),
    };
    let (user, host) = user_host
        .split_once('@')
        .ok_or_else(|| ConfigError::Invalid { name: "SSH_FALLBACK_TARGET", value: target.clone() })?;
    Ok(Some(SshFallbackConfig { user: user.to_string(), host: host.to_string(), port }))
}

fn tls_from_env() -> Result<Option<TlsConfig>, ConfigError> {
    let cert = std::env::var("TLS_CERT").ok();
    let key = std::env::var("TLS_KEY").ok();
    match (cert, key) {
        (Some(cert), Some(key)) => Ok(Some(TlsConfig { cert_path: PathBuf::from(cert), key_path: PathBuf::from(key) })),
        (None, None) => Ok(None),
        _ => Err(ConfigError::Missing("TLS_CERT and TLS_KEY must be set together")),
    }
}

/// Parses `PROVIDERS`, a `;`-separated list of
/// `name:model:class:context_window:endpoint:api_key_env[:daily_limit]`
/// entries (spec §4.3: the Router needs an ordered provider list, and no
/// vendor SDK is in scope, so configuration stays a flat string table).
fn providers_from_env() -> Result<Vec<ProviderConfig>, ConfigError> {
    let Ok(raw) = std::env::var("PROVIDERS") else { return Ok(Vec::new()) };
    raw.split(';').filter(|entry| !entry.trim().is_empty()).map(parse_provider_entry).collect()
}

fn parse_provider_entry(entry: &str) -> Result<ProviderConfig, ConfigError> {
    let fields: Vec<&str> = entry.split(':').collect();
    let invalid = || ConfigError::Invalid { name: "PROVIDERS", value: entry.to_string() };
    let [name, model, class, context_window, endpoint, api_key_env] = fields[..6.min(fields.len())].try_into().map_err(|_| invalid())?;
    let class = match class {
        "cheap" => crew_engine::provider::ProviderClass::Cheap,
        "mid" => crew_engine::provider::ProviderClass::Mid,
        "strong" => crew_engine::provider::ProviderClass::Strong,
        "premium" => crew_engine::provider::ProviderClass::Premium,
        _ => return Err(invalid()),
    };
    let context_window: u32 = context_window.parse().map_err(|_| invalid())?;
    let api_key = std::env::var(api_key_env).unwrap_or_default();
    let daily_request_limit = fields.get(6).and_then(|s| s.parse().ok());
    Ok(ProviderConfig {
        name: name.to_string(),
        model: model.to_string(),
        class,
        context_window,
        endpoint: endpoint.to_string(),
        api_key,
        daily_request_limit,
    })
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
