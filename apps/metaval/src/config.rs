//! # Configuration
//!
//! Optional TOML file plus environment overrides.
//!
//! ```toml
//! [workflow]
//! completion = "durable"       # or "auto-reset" (default)
//!
//! [delays]
//! chat_reply_ms = 800
//! draft_generation_ms = 2000
//!
//! [user]
//! name = "Robert Chen"
//!
//! [search]
//! today = "2026-01-20"         # fixes the reference date of "expiring" views
//! ```
//!
//! `METAVAL_COMPLETION` and `METAVAL_USER` override the file.

use chrono::NaiveDate;
use metaval_core::{CompletionPolicy, MetavalError, SessionOptions};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File read when `--config` is not given, if present.
pub const DEFAULT_CONFIG_PATH: &str = "metaval.toml";

pub const ENV_COMPLETION: &str = "METAVAL_COMPLETION";
pub const ENV_USER: &str = "METAVAL_USER";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkflowConfig {
    pub completion: Option<CompletionPolicy>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DelayConfig {
    pub chat_reply_ms: Option<u64>,
    pub draft_generation_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserConfig {
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub today: Option<NaiveDate>,
}

/// Application configuration. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub workflow: WorkflowConfig,
    pub delays: DelayConfig,
    pub user: UserConfig,
    pub search: SearchConfig,
}

impl AppConfig {
    /// Load from `path`, or from [`DEFAULT_CONFIG_PATH`] when `None`.
    ///
    /// A missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, MetavalError> {
        let path = path.unwrap_or(Path::new(DEFAULT_CONFIG_PATH));
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(path).map_err(|e| {
            MetavalError::ConfigError(format!("Cannot read {}: {}", path.display(), e))
        })?;
        let config = Self::from_toml(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    pub fn from_toml(contents: &str) -> Result<Self, MetavalError> {
        toml::from_str(contents).map_err(|e| MetavalError::ConfigError(e.to_string()))
    }

    /// Apply environment overrides read through `lookup`.
    pub fn apply_env(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), MetavalError> {
        if let Some(value) = lookup(ENV_COMPLETION) {
            self.workflow.completion = Some(value.parse()?);
        }
        if let Some(value) = lookup(ENV_USER)
            && !value.trim().is_empty()
        {
            self.user.name = Some(value.trim().to_string());
        }
        Ok(())
    }

    /// Session options, using `today` when the file does not pin a date.
    #[must_use]
    pub fn session_options(&self, today: NaiveDate) -> SessionOptions {
        let mut options = SessionOptions::new(self.search.today.unwrap_or(today));
        if let Some(policy) = self.workflow.completion {
            options.completion = policy;
        }
        if let Some(ms) = self.delays.chat_reply_ms {
            options.chat_reply_delay_ms = ms;
        }
        if let Some(ms) = self.delays.draft_generation_ms {
            options.draft_generation_delay_ms = ms;
        }
        if let Some(name) = &self.user.name {
            options.current_user.clone_from(name);
        }
        options
    }

    #[must_use]
    pub fn completion(&self) -> CompletionPolicy {
        self.workflow.completion.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    #[test]
    fn empty_file_is_default() {
        let config = AppConfig::from_toml("").expect("parse");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.completion(), CompletionPolicy::AutoReset);
    }

    #[test]
    fn env_overrides_file() {
        let mut config = AppConfig::from_toml("[user]\nname = \"Emma Wilson\"\n").expect("parse");
        config
            .apply_env(|key| match key {
                ENV_COMPLETION => Some("durable".to_string()),
                ENV_USER => Some("John Chen".to_string()),
                _ => None,
            })
            .expect("env");
        assert_eq!(config.completion(), CompletionPolicy::Durable);
        assert_eq!(config.user.name.as_deref(), Some("John Chen"));
    }

    #[test]
    fn bad_env_policy_is_config_error() {
        let mut config = AppConfig::default();
        let result = config.apply_env(|key| (key == ENV_COMPLETION).then(|| "sometimes".to_string()));
        assert!(matches!(result, Err(MetavalError::ConfigError(_))));
    }

    #[test]
    fn pinned_date_wins_over_clock() {
        let config = AppConfig::from_toml("[search]\ntoday = \"2026-01-20\"\n").expect("parse");
        let options = config.session_options(date(2030, 1, 1));
        assert_eq!(options.today, date(2026, 1, 20));
    }
}
