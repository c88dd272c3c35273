//! Tests for bot configuration loading.

use std::fs;
use tempfile::TempDir;

use strictly_chat::BotConfig;

#[test]
fn test_defaults() {
    let config = BotConfig::default();

    assert_eq!(config.command(), "tictactoe");
    assert_eq!(config.command_prefix(), "!");
    assert!(config.session_ttl().is_none());
    assert!(config.webhook_url().is_none());
    assert!(!*config.case_by_side());
}

#[test]
fn test_empty_toml_uses_defaults() {
    let config = BotConfig::from_toml("").expect("Parse failed");

    assert_eq!(config, BotConfig::default());
}

#[test]
fn test_full_toml() {
    let config = BotConfig::from_toml(
        r#"
command = "ttt"
command_prefix = "/"
session_ttl_secs = 600
webhook_url = "http://chat.local/send"
db_path = "chat.db"
case_by_side = true

[participants]
u1 = "Alice"
u2 = "Bob"
"#,
    )
    .expect("Parse failed");

    assert_eq!(config.command(), "ttt");
    assert_eq!(config.command_prefix(), "/");
    assert_eq!(config.session_ttl(), Some(chrono::Duration::minutes(10)));
    assert_eq!(config.webhook_url().as_deref(), Some("http://chat.local/send"));
    assert_eq!(config.db_path().as_deref(), Some("chat.db"));
    assert!(*config.case_by_side());
    assert_eq!(config.participants().get("u2").map(String::as_str), Some("Bob"));
}

#[test]
fn test_invalid_toml_fails() {
    let result = BotConfig::from_toml("session_ttl_secs = \"soon\"");

    assert!(result.is_err());
}

#[test]
fn test_from_file() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("bot.toml");
    fs::write(&path, "command = \"noughts\"\n").expect("Failed to write TOML");

    let config = BotConfig::from_file(&path).expect("Load failed");

    assert_eq!(config.command(), "noughts");
    assert_eq!(config.command_prefix(), "!");
}

#[test]
fn test_load_missing_file_uses_defaults() {
    let dir = TempDir::new().expect("Failed to create temp dir");

    let config = BotConfig::load(dir.path().join("absent.toml")).expect("Load failed");

    assert_eq!(config.command(), "tictactoe");
}

#[test]
fn test_setters() {
    let config = BotConfig::default()
        .with_command("ttt".to_string())
        .with_session_ttl_secs(Some(30));

    assert_eq!(config.command(), "ttt");
    assert_eq!(config.session_ttl(), Some(chrono::Duration::seconds(30)));
}

#[test]
fn test_zero_ttl_rejected() {
    let result = BotConfig::from_toml("session_ttl_secs = 0");

    assert!(result.is_err());
}

#[test]
fn test_zero_ttl_setter_means_no_expiry() {
    let config = BotConfig::default().with_session_ttl_secs(Some(0));

    assert!(config.validate().is_err());
    assert_eq!(config.session_ttl(), None);
}
