//! Tests for config::ServerConfig environment loading.

mod support;

use dinebook::config::{ConfigError, ServerConfig, DEFAULT_BODY_LIMIT_BYTES, DEFAULT_PORT};

const KEYS: [&str; 3] = ["HOST", "PORT", "BODY_LIMIT_BYTES"];

fn cleared() -> Vec<(&'static str, Option<&'static str>)> {
    KEYS.iter().map(|k| (*k, None)).collect()
}

#[test]
fn test_defaults_when_unset() {
    let config = support::with_scoped_env(&cleared(), ServerConfig::from_env).unwrap();
    assert_eq!(config, ServerConfig::default());
    assert_eq!(config.port, DEFAULT_PORT);
    assert_eq!(config.body_limit_bytes, DEFAULT_BODY_LIMIT_BYTES);
}

#[test]
fn test_values_from_env() {
    let config = support::with_scoped_env(
        &[
            ("HOST", Some("127.0.0.1")),
            ("PORT", Some(" 8080 ")),
            ("BODY_LIMIT_BYTES", Some("2048")),
        ],
        ServerConfig::from_env,
    )
    .unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.body_limit_bytes, 2048);
    assert_eq!(config.socket_addr().unwrap().to_string(), "127.0.0.1:8080");
}

#[test]
fn test_invalid_port_is_reported() {
    let err = support::with_scoped_env(
        &[("PORT", Some("eighty")), ("BODY_LIMIT_BYTES", None)],
        ServerConfig::from_env,
    )
    .unwrap_err();

    match err {
        ConfigError::InvalidValue { key, value } => {
            assert_eq!(key, "PORT");
            assert_eq!(value, "eighty");
        }
        other => panic!("unexpected error {:?}", other),
    }
}

#[test]
fn test_port_out_of_range_is_reported() {
    let err = support::with_scoped_env(&[("PORT", Some("70000"))], ServerConfig::from_env)
        .unwrap_err();
    assert!(err.to_string().contains("PORT"));
}
