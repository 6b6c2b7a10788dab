//! Integration tests for logging system

use bridge_traits::time::{ConsoleLogger, LogLevel};
use core_runtime::logging::{
    abbreviate_id, init_logging, redact_if_sensitive, LogFormat, LoggingConfig,
};
use std::sync::Arc;

#[test]
fn test_redaction_of_credentials() {
    assert_eq!(redact_if_sensitive("token", "conn-token"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("auth_token", "xyz"), "[REDACTED]");
    assert_eq!(redact_if_sensitive("DEV_ID", "testing-dev"), "[REDACTED]");
}

#[test]
fn test_normal_values_pass_through() {
    assert_eq!(redact_if_sensitive("reference_id", "ref-1"), "ref-1");
    assert_eq!(redact_if_sensitive("data_type", "STEPS"), "STEPS");
    assert_eq!(redact_if_sensitive("user_id", "user_123"), "user_123");
}

#[test]
fn test_abbreviated_ids_hide_tail() {
    let id = "2f1c7e4a-95b5-4c1e-b4f3-6f2f0e6c9a11";
    let short = abbreviate_id(id);
    assert!(short.starts_with("2f1c7e"));
    assert!(!short.contains("6f2f0e6c9a11"));
}

#[test]
fn test_format_selection() {
    #[cfg(debug_assertions)]
    assert_eq!(LoggingConfig::default().format, LogFormat::Pretty);

    #[cfg(not(debug_assertions))]
    assert_eq!(LoggingConfig::default().format, LogFormat::Json);
}

#[test]
fn test_init_twice_fails() {
    // Only one global subscriber per process.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Warn)
        .with_logger_sink(Arc::new(ConsoleLogger::default()));

    assert!(init_logging(config.clone()).is_ok());
    assert!(init_logging(config).is_err());
}

#[test]
fn test_invalid_filter_is_rejected() {
    let config = LoggingConfig::default().with_filter("core_health=notalevel[");
    // Global subscriber may already be set by another test; either way this must fail.
    assert!(init_logging(config).is_err());
}
