// src/config/mod.rs
//! Runtime settings read from the process environment (and `.env`, loaded by
//! the binary before this runs).

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::collect::reddit;
use crate::collect::RankingPolicy;

pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
pub const DEFAULT_OUTPUT_PATH: &str = "pop_culture_roundup.txt";
/// Upper bound on the summary request.
pub const DEFAULT_SUMMARY_TIMEOUT_SECS: u64 = 120;
pub const SUMMARY_MAX_TOKENS: u32 = 2500;

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` when unset or blank.
    pub api_key: Option<String>,
    pub model: String,
    pub openai_base_url: String,
    pub reddit_base_url: String,
    pub output_path: PathBuf,
    pub summary_timeout: Duration,
    pub ranking: RankingPolicy,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            openai_base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            reddit_base_url: reddit::DEFAULT_BASE_URL.to_string(),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            summary_timeout: Duration::from_secs(DEFAULT_SUMMARY_TIMEOUT_SECS),
            ranking: RankingPolicy::Engagement,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();

        cfg.api_key = non_blank(ENV_API_KEY);
        if let Some(m) = non_blank("DIGEST_MODEL") {
            cfg.model = m;
        }
        if let Some(u) = non_blank("OPENAI_BASE_URL") {
            cfg.openai_base_url = u;
        }
        if let Some(u) = non_blank("REDDIT_BASE_URL") {
            cfg.reddit_base_url = u;
        }
        if let Some(p) = non_blank("DIGEST_OUTPUT_PATH") {
            cfg.output_path = PathBuf::from(p);
        }
        if let Some(s) = non_blank("DIGEST_SUMMARY_TIMEOUT_SECS") {
            let secs: u64 = s
                .parse()
                .with_context(|| format!("DIGEST_SUMMARY_TIMEOUT_SECS={s} is not a number"))?;
            cfg.summary_timeout = Duration::from_secs(secs.max(1));
        }
        if non_blank("DIGEST_APPLY_SOURCE_WEIGHTS").is_some_and(|v| is_truthy(&v)) {
            cfg.ranking = RankingPolicy::SourceWeighted;
        }

        Ok(cfg)
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

fn non_blank(var: &str) -> Option<String> {
    env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn is_truthy(v: &str) -> bool {
    matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 8] = [
        ENV_API_KEY,
        "DIGEST_MODEL",
        "OPENAI_BASE_URL",
        "REDDIT_BASE_URL",
        "DIGEST_OUTPUT_PATH",
        "DIGEST_SUMMARY_TIMEOUT_SECS",
        "DIGEST_APPLY_SOURCE_WEIGHTS",
        "DIGEST_SOURCES_PATH",
    ];

    fn clear() {
        for v in VARS {
            env::remove_var(v);
        }
    }

    #[serial_test::serial]
    #[test]
    fn defaults_when_env_is_empty() {
        clear();
        let cfg = AppConfig::from_env().unwrap();
        assert!(!cfg.has_credential());
        assert_eq!(cfg.model, "gpt-4o-mini");
        assert_eq!(cfg.output_path, PathBuf::from("pop_culture_roundup.txt"));
        assert_eq!(cfg.summary_timeout, Duration::from_secs(120));
        assert_eq!(cfg.ranking, RankingPolicy::Engagement);
    }

    #[serial_test::serial]
    #[test]
    fn overrides_and_blank_key() {
        clear();
        env::set_var(ENV_API_KEY, "   ");
        env::set_var("DIGEST_MODEL", "gpt-4o");
        env::set_var("DIGEST_SUMMARY_TIMEOUT_SECS", "30");
        env::set_var("DIGEST_APPLY_SOURCE_WEIGHTS", "yes");
        let cfg = AppConfig::from_env().unwrap();
        assert!(cfg.api_key.is_none(), "blank key counts as missing");
        assert_eq!(cfg.model, "gpt-4o");
        assert_eq!(cfg.summary_timeout, Duration::from_secs(30));
        assert_eq!(cfg.ranking, RankingPolicy::SourceWeighted);

        env::set_var("DIGEST_SUMMARY_TIMEOUT_SECS", "soon");
        assert!(AppConfig::from_env().is_err());
        clear();
    }
}
