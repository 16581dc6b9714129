use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use anyhow::{bail, Context, Result};

use crate::generation::orchestrator::StageSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub profile_dir: PathBuf,
    pub stage_timeout: Duration,
    pub summary_max_tokens: u32,
    pub skills_max_tokens: u32,
    pub experience_max_tokens: u32,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key → value source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = StageSettings::default();
        let stage_timeout_secs: u64 =
            parse_or(&lookup, "STAGE_TIMEOUT_SECS", defaults.timeout.as_secs())?;
        if stage_timeout_secs == 0 {
            bail!("STAGE_TIMEOUT_SECS must be at least 1 second, got 0");
        }

        Ok(Config {
            anthropic_api_key: lookup("ANTHROPIC_API_KEY")
                .filter(|v| !v.trim().is_empty())
                .context("Required environment variable 'ANTHROPIC_API_KEY' is not set")?,
            profile_dir: lookup("PROFILE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("profiles")),
            stage_timeout: Duration::from_secs(stage_timeout_secs),
            summary_max_tokens: parse_or(
                &lookup,
                "SUMMARY_MAX_TOKENS",
                defaults.summary_max_tokens,
            )?,
            skills_max_tokens: parse_or(&lookup, "SKILLS_MAX_TOKENS", defaults.skills_max_tokens)?,
            experience_max_tokens: parse_or(
                &lookup,
                "EXPERIENCE_MAX_TOKENS",
                defaults.experience_max_tokens,
            )?,
            rust_log: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        })
    }

    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            timeout: self.stage_timeout,
            summary_max_tokens: self.summary_max_tokens,
            skills_max_tokens: self.skills_max_tokens,
            experience_max_tokens: self.experience_max_tokens,
        }
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("{key} must be a valid number, got '{raw}'")),
        None => Ok(default),
    }
}
