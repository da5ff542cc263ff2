//! Note store configuration.
//!
//! # Responsibility
//! - Hold the namespace prefix and storage quota shared by all front ends.
//! - Apply `SIMPLENOTE_*` environment overrides over defaults.
//!
//! # Invariants
//! - A validated prefix is non-empty and contains no whitespace.

use crate::model::note::DEFAULT_PREFIX;
use crate::repo::kv_repo::DEFAULT_QUOTA_CHARS;
use serde::{Deserialize, Serialize};

pub const ENV_PREFIX: &str = "SIMPLENOTE_PREFIX";
pub const ENV_QUOTA_CHARS: &str = "SIMPLENOTE_QUOTA_CHARS";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotepadConfig {
    /// Namespace prefix owned by this application inside the shared store.
    pub prefix: String,
    /// Storage capacity in characters; `None` disables the check.
    pub quota_chars: Option<u64>,
}

impl Default for NotepadConfig {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
            quota_chars: Some(DEFAULT_QUOTA_CHARS),
        }
    }
}

impl NotepadConfig {
    /// Defaults with environment overrides applied.
    pub fn from_env() -> Result<Self, String> {
        let mut config = Self::default();
        config.apply_overrides(
            std::env::var(ENV_PREFIX).ok().as_deref(),
            std::env::var(ENV_QUOTA_CHARS).ok().as_deref(),
        )?;
        Ok(config)
    }

    /// Applies raw override values; `None` leaves a field untouched.
    pub fn apply_overrides(
        &mut self,
        prefix: Option<&str>,
        quota_chars: Option<&str>,
    ) -> Result<(), String> {
        if let Some(prefix) = prefix {
            self.prefix = prefix.trim().to_string();
        }
        if let Some(raw) = quota_chars {
            self.quota_chars = parse_quota(raw)?;
        }
        self.validate()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.prefix.is_empty() {
            return Err("prefix cannot be empty".to_string());
        }
        if self.prefix.chars().any(char::is_whitespace) {
            return Err(format!("prefix must not contain whitespace, got `{}`", self.prefix));
        }
        Ok(())
    }
}

/// Parses a quota value; `0` and `none` mean unlimited.
pub fn parse_quota(raw: &str) -> Result<Option<u64>, String> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }
    match trimmed.parse::<u64>() {
        Ok(0) => Ok(None),
        Ok(value) => Ok(Some(value)),
        Err(_) => Err(format!(
            "invalid quota `{trimmed}`; expected a character count or `none`"
        )),
    }
}
