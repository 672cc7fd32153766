//! Configuration loading for newsbrief.
//!
//! Settings live in a TOML file (`newsbrief.toml` by default): the ordered
//! source list, rate/concurrency limits, the LLM endpoint, and mail
//! delivery settings. API keys are taken from the environment so they never
//! land in the config file.
//!
//! Invalid or missing configuration is a startup-time fatal error; nothing
//! in the pipeline runs without a valid config.

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::models::NewsSource;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("no sources configured")]
    NoSources,
    #[error("no enabled sources configured")]
    NoEnabledSources,
    #[error("{0} must be greater than zero")]
    NonPositiveLimit(&'static str),
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),
}

/// Rate and concurrency ceilings for the run.
#[derive(Debug, Clone, Deserialize)]
pub struct LimitsConfig {
    /// Shared ceiling on extraction + summarization calls per minute.
    #[serde(default = "default_max_calls_per_minute")]
    pub max_calls_per_minute: u32,
    /// Worker-pool width for the concurrent scheduler.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

fn default_max_calls_per_minute() -> u32 {
    5
}

fn default_concurrency() -> usize {
    4
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_calls_per_minute: default_max_calls_per_minute(),
            concurrency: default_concurrency(),
        }
    }
}

/// LLM endpoint settings. The key comes from `OPENAI_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
}

fn default_api_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            model: default_model(),
        }
    }
}

/// Mail delivery settings. The key comes from `MAILGUN_API_KEY`.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Mailgun domain endpoint, e.g. `https://api.mailgun.net/v3/mg.example.com`.
    pub endpoint: String,
    pub from: String,
    pub to: String,
}

/// Root configuration for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub sources: Vec<NewsSource>,
    #[serde(default)]
    pub limits: LimitsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    pub mail: Option<MailConfig>,
}

impl Config {
    /// Load and validate configuration from `path`.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.sources.is_empty() {
            return Err(ConfigError::NoSources);
        }
        if !self.sources.iter().any(|s| s.enabled) {
            return Err(ConfigError::NoEnabledSources);
        }
        if self.limits.max_calls_per_minute == 0 {
            return Err(ConfigError::NonPositiveLimit("limits.max_calls_per_minute"));
        }
        if self.limits.concurrency == 0 {
            return Err(ConfigError::NonPositiveLimit("limits.concurrency"));
        }
        Ok(())
    }

    /// The sources that participate in this run, in configured order.
    pub fn enabled_sources(&self) -> Vec<NewsSource> {
        self.sources.iter().filter(|s| s.enabled).cloned().collect()
    }
}

/// Read a required secret from the environment.
pub fn env_secret(name: &'static str) -> Result<String, ConfigError> {
    std::env::var(name).map_err(|_| ConfigError::MissingEnv(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const MINIMAL: &str = r#"
        [[sources]]
        name = "A"
        url = "http://a.test"
    "#;

    fn parse(s: &str) -> Result<Config, ConfigError> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn minimal_config_gets_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.limits.max_calls_per_minute, 5);
        assert_eq!(config.limits.concurrency, 4);
        assert_eq!(config.api.model, "gpt-4o-mini");
        assert!(config.mail.is_none());
    }

    #[test]
    fn empty_source_list_is_fatal() {
        let err = parse("sources = []").unwrap_err();
        assert!(matches!(err, ConfigError::NoSources));
    }

    #[test]
    fn all_sources_disabled_is_fatal() {
        let err = parse(
            r#"
            [[sources]]
            name = "A"
            url = "http://a.test"
            enabled = false
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NoEnabledSources));
    }

    #[test]
    fn zero_rate_limit_is_fatal() {
        let err = parse(
            r#"
            [[sources]]
            name = "A"
            url = "http://a.test"

            [limits]
            max_calls_per_minute = 0
        "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::NonPositiveLimit(_)));
    }

    #[test]
    fn enabled_sources_preserves_configured_order() {
        let config = parse(
            r#"
            [[sources]]
            name = "A"
            url = "http://a.test"

            [[sources]]
            name = "B"
            url = "http://b.test"
            enabled = false

            [[sources]]
            name = "C"
            url = "http://c.test"
        "#,
        )
        .unwrap();
        let names: Vec<_> = config
            .enabled_sources()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].name, "A");
    }

    #[test]
    fn load_missing_file_is_fatal() {
        let err = Config::load(Path::new("/nonexistent/newsbrief.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read(_)));
    }
}
