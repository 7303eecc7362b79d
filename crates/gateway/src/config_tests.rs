use super::*;

fn clear_env() {
    for key in [
        "AUTH_TOKEN",
        "CONTROL_PLANE_ADDR",
        "CHANNEL_ADDR",
        "RATE_LIMIT_PER_MINUTE",
        "SSH_FALLBACK_TARGET",
        "PROVIDERS",
        "TLS_CERT",
        "TLS_KEY",
    ] {
        std::env::remove_var(key);
    }
}

#[test]
fn missing_auth_token_is_an_error() {
    clear_env();
    let err = GatewayConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("AUTH_TOKEN")));
}

#[test]
fn defaults_apply_when_unset() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.control_plane_addr.to_string(), "127.0.0.1:8088");
    assert_eq!(config.channel_addr.to_string(), "0.0.0.0:8089");
    assert_eq!(config.rate_limit_per_minute, 30);
    assert!(config.ssh_fallback.is_none());
    assert!(config.providers.is_empty());
    assert!(config.tls.is_none());
}

#[test]
fn ssh_fallback_target_parses_user_host_and_default_port() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("SSH_FALLBACK_TARGET", "deploy@10.0.0.5");
    let config = GatewayConfig::from_env().unwrap();
    let ssh = config.ssh_fallback.unwrap();
    assert_eq!(ssh.user, "deploy");
    assert_eq!(ssh.host, "10.0.0.5");
    assert_eq!(ssh.port, 22);
    std::env::remove_var("SSH_FALLBACK_TARGET");
}

#[test]
fn ssh_fallback_target_parses_explicit_port() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("SSH_FALLBACK_TARGET", "deploy@10.0.0.5:2222");
    let config = GatewayConfig::from_env().unwrap();
    let ssh = config.ssh_fallback.unwrap();
    assert_eq!(ssh.port, 2222);
    std::env::remove_var("SSH_FALLBACK_TARGET");
}

#[test]
fn ssh_fallback_target_without_user_is_invalid() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("SSH_FALLBACK_TARGET", "10.0.0.5");
    let err = GatewayConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "SSH_FALLBACK_TARGET", .. }));
    std::env::remove_var("SSH_FALLBACK_TARGET");
}

#[test]
fn tls_requires_both_cert_and_key() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("TLS_CERT", "/etc/crewline/cert.pem");
    let err = GatewayConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing(_)));
    std::env::remove_var("TLS_CERT");
}

#[test]
fn providers_entry_parses_six_mandatory_fields_and_optional_limit() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("CLAUDE_KEY", "sk-test");
    std::env::set_var("PROVIDERS", "claude:claude-3:strong:200000:https://api.example/v1:CLAUDE_KEY:500");
    let config = GatewayConfig::from_env().unwrap();
    assert_eq!(config.providers.len(), 1);
    let provider = &config.providers[0];
    assert_eq!(provider.name, "claude");
    assert_eq!(provider.context_window, 200_000);
    assert_eq!(provider.daily_request_limit, Some(500));
    assert_eq!(provider.api_key, "sk-test");
    std::env::remove_var("CLAUDE_KEY");
    std::env::remove_var("PROVIDERS");
}

#[test]
fn providers_entry_with_unknown_class_is_invalid() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("PROVIDERS", "claude:claude-3:ultra:200000:https://api.example/v1:CLAUDE_KEY");
    let err = GatewayConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { name: "PROVIDERS", .. }));
    std::env::remove_var("PROVIDERS");
}
