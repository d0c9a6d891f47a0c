//! Tests for configuration file loading.

// Allow unwrap and panic in tests - these are standard for test code
#![allow(clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use metaval::config::AppConfig;
use metaval_core::{CompletionPolicy, MetavalError};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_missing_file_gives_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::load(Some(&dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_full_file() {
    let file = write_config(
        r#"
[workflow]
completion = "durable"

[delays]
chat_reply_ms = 10
draft_generation_ms = 20

[user]
name = "Emma Wilson"

[search]
today = "2026-02-01"
"#,
    );

    let config = AppConfig::load(Some(file.path())).unwrap();
    let today = NaiveDate::from_ymd_opt(2030, 6, 1).unwrap();
    let options = config.session_options(today);

    assert_eq!(options.completion, CompletionPolicy::Durable);
    assert_eq!(options.chat_reply_delay_ms, 10);
    assert_eq!(options.draft_generation_delay_ms, 20);
    assert_eq!(options.current_user, "Emma Wilson");
    assert_eq!(options.today, NaiveDate::from_ymd_opt(2026, 2, 1).unwrap());
}

#[test]
fn test_partial_file_keeps_defaults() {
    let file = write_config("[delays]\nchat_reply_ms = 5\n");
    let config = AppConfig::load(Some(file.path())).unwrap();
    let options = config.session_options(NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());

    assert_eq!(options.chat_reply_delay_ms, 5);
    assert_eq!(options.draft_generation_delay_ms, 2000);
    assert_eq!(options.completion, CompletionPolicy::AutoReset);
    assert_eq!(options.current_user, "Robert Chen");
}

#[test]
fn test_invalid_file_is_config_error() {
    let file = write_config("[workflow]\ncompletion = \"sometimes\"\n");
    assert!(matches!(
        AppConfig::load(Some(file.path())),
        Err(MetavalError::ConfigError(_))
    ));

    let file = write_config("[unknown]\nkey = 1\n");
    assert!(matches!(
        AppConfig::load(Some(file.path())),
        Err(MetavalError::ConfigError(_))
    ));
}
