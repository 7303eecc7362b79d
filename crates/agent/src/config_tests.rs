use super::*;

fn clear_env() {
    for key in ["AUTH_TOKEN", "GATEWAY_URL", "PROJECT_DIR", "ALLOWED_ROOTS", "RATE_LIMIT_PER_MINUTE", "EMERGENCY_STOP", "DEFAULT_TIMEOUT_SECS"]
    {
        std::env::remove_var(key);
    }
}

#[test]
fn missing_auth_token_is_an_error() {
    clear_env();
    std::env::set_var("GATEWAY_URL", "ws://127.0.0.1:8089/channel");
    let err = AgentConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("AUTH_TOKEN")));
}

#[test]
fn missing_gateway_url_is_an_error() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    let err = AgentConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::Missing("GATEWAY_URL")));
}

#[test]
fn defaults_apply_when_unset() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("GATEWAY_URL", "ws://127.0.0.1:8089/channel");
    let config = AgentConfig::from_env().unwrap();
    assert_eq!(config.rate_limit_per_minute, 30);
    assert!(!config.initial_emergency_stop);
    assert_eq!(config.allowed_roots, vec![config.project_dir.clone()]);
}

#[test]
fn allowed_roots_parses_colon_separated_list() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("GATEWAY_URL", "ws://127.0.0.1:8089/channel");
    std::env::set_var("ALLOWED_ROOTS", "/repo:/scratch");
    let config = AgentConfig::from_env().unwrap();
    assert_eq!(config.allowed_roots, vec![std::path::PathBuf::from("/repo"), std::path::PathBuf::from("/scratch")]);
    std::env::remove_var("ALLOWED_ROOTS");
}

#[test]
fn emergency_stop_flag_accepts_common_truthy_spellings() {
    clear_env();
    std::env::set_var("AUTH_TOKEN", "secret");
    std::env::set_var("GATEWAY_URL", "ws://127.0.0.1:8089/channel");
    std::env::set_var("EMERGENCY_STOP", "yes");
    let config = AgentConfig::from_env().unwrap();
    assert!(config.initial_emergency_stop);
    std::env::remove_var("EMERGENCY_STOP");
}
