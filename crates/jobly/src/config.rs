//! Runtime configuration.
//!
//! Loaded either from a TOML file (`jobly.toml`) whose string values may
//! reference environment variables as `${VAR}`, or directly from the
//! environment (after reading a `.env` file, if present).
//!
//! ```toml
//! database_url = "${DATABASE_URL}"
//! secret_key = "${SECRET_KEY}"
//! pool_size = 16
//! token_ttl_secs = 86400
//! ```

use crate::error::{JoblyError, JoblyResult};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

const DEFAULT_POOL_SIZE: usize = 16;
const DEFAULT_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JoblyConfig {
    pub database_url: String,
    pub secret_key: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
}

fn default_pool_size() -> usize {
    DEFAULT_POOL_SIZE
}

fn default_token_ttl_secs() -> u64 {
    DEFAULT_TOKEN_TTL_SECS
}

impl JoblyConfig {
    /// Load from a TOML file, expanding `${VAR}` references.
    pub fn load(path: impl AsRef<Path>) -> JoblyResult<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|e| {
            JoblyError::Config(format!("failed to read config file {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&raw)
            .map_err(|e| JoblyError::Config(format!("{}: {e}", path.display())))
    }

    /// Parse TOML text, expanding `${VAR}` references.
    pub fn from_toml_str(raw: &str) -> JoblyResult<Self> {
        let mut config: JoblyConfig = toml::from_str(raw)
            .map_err(|e| JoblyError::Config(format!("failed to parse config: {e}")))?;
        config.database_url = expand_env_vars(&config.database_url)?;
        config.secret_key = expand_env_vars(&config.secret_key)?;
        config.validate()?;
        Ok(config)
    }

    /// Build from `DATABASE_URL`, `SECRET_KEY`, `JOBLY_POOL_SIZE` and
    /// `JOBLY_TOKEN_TTL_SECS`, reading `.env` first when one exists.
    pub fn from_env() -> JoblyResult<Self> {
        let _ = dotenvy::dotenv();

        let config = Self {
            database_url: required_env("DATABASE_URL")?,
            secret_key: required_env("SECRET_KEY")?,
            pool_size: parsed_env("JOBLY_POOL_SIZE")?.unwrap_or(DEFAULT_POOL_SIZE),
            token_ttl_secs: parsed_env("JOBLY_TOKEN_TTL_SECS")?.unwrap_or(DEFAULT_TOKEN_TTL_SECS),
        };
        config.validate()?;
        Ok(config)
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    fn validate(&self) -> JoblyResult<()> {
        if self.database_url.trim().is_empty() {
            return Err(JoblyError::Config("database_url must not be empty".into()));
        }
        if self.secret_key.is_empty() {
            return Err(JoblyError::Config("secret_key must not be empty".into()));
        }
        if self.pool_size == 0 {
            return Err(JoblyError::Config("pool_size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Database to run tests against: `TEST_DATABASE_URL`, else `DATABASE_URL`.
pub fn database_url_for_tests() -> Option<String> {
    let _ = dotenvy::dotenv();
    std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .ok()
}

fn required_env(key: &str) -> JoblyResult<String> {
    std::env::var(key).map_err(|_| JoblyError::Config(format!("missing env var: {key}")))
}

fn parsed_env<T: std::str::FromStr>(key: &str) -> JoblyResult<Option<T>> {
    match std::env::var(key) {
        Ok(v) => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| JoblyError::Config(format!("invalid value for {key}: {v}"))),
        Err(_) => Ok(None),
    }
}

fn expand_env_vars(input: &str) -> JoblyResult<String> {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if c == '$' && chars.peek() == Some(&'{') {
            chars.next(); // consume '{'

            let mut key = String::new();
            let mut closed = false;
            for ch in chars.by_ref() {
                if ch == '}' {
                    closed = true;
                    break;
                }
                key.push(ch);
            }

            if !closed {
                return Err(JoblyError::Config(format!(
                    "unterminated env var reference: ${{{key}}}"
                )));
            }
            if key.is_empty() {
                return Err(JoblyError::Config("invalid env var reference: ${}".into()));
            }

            let v = std::env::var(&key).map_err(|_| {
                JoblyError::Config(format!("missing env var for config expansion: {key}"))
            })?;
            out.push_str(&v);
            continue;
        }

        out.push(c);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_values_and_defaults() {
        let config = JoblyConfig::from_toml_str(
            r#"
            database_url = "postgres://localhost/jobly"
            secret_key = "secret-dev"
            "#,
        )
        .unwrap();
        assert_eq!(config.database_url, "postgres://localhost/jobly");
        assert_eq!(config.pool_size, 16);
        assert_eq!(config.token_ttl(), Duration::from_secs(86400));
    }

    #[test]
    fn expands_env_references() {
        // PATH is set in every test environment.
        let path = std::env::var("PATH").unwrap();
        let out = expand_env_vars("prefix-${PATH}-suffix").unwrap();
        assert_eq!(out, format!("prefix-{path}-suffix"));
        assert_eq!(expand_env_vars("no refs $HOME").unwrap(), "no refs $HOME");
    }

    #[test]
    fn bad_env_references_are_errors() {
        assert!(expand_env_vars("${UNTERMINATED").is_err());
        assert!(expand_env_vars("${}").is_err());
        assert!(expand_env_vars("${JOBLY_SURELY_NOT_SET_1F2E}").is_err());
    }

    #[test]
    fn zero_pool_size_is_rejected() {
        let err = JoblyConfig::from_toml_str(
            r#"
            database_url = "postgres://localhost/jobly"
            secret_key = "k"
            pool_size = 0
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, JoblyError::Config(_)));
    }

    #[test]
    fn missing_keys_are_parse_errors() {
        let err = JoblyConfig::from_toml_str(r#"secret_key = "k""#).unwrap_err();
        assert!(matches!(err, JoblyError::Config(_)));
    }
}
