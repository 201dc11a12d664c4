// src/ingest/config.rs
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const ENV_CONFIG_PATH: &str = "EUROMILLIONS_CONFIG";
pub const ENV_FETCH_TIMEOUT_SECS: &str = "EUROMILLIONS_FETCH_TIMEOUT_SECS";
pub const ENV_POLITENESS_DELAY_MS: &str = "EUROMILLIONS_POLITENESS_DELAY_MS";

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_POLITENESS_DELAY_MS: u64 = 1_000;
pub const DEFAULT_REFERER: &str = "https://www.bing.com/?cc=pt";

const DEFAULT_USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 14.4; rv:124.0) Gecko/20100101 Firefox/124.0",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/123.0.0.0 Safari/537.36 Edg/123.0.2420.81",
];

fn default_fetch_timeout_secs() -> u64 {
    DEFAULT_FETCH_TIMEOUT_SECS
}
fn default_politeness_delay_ms() -> u64 {
    DEFAULT_POLITENESS_DELAY_MS
}
fn default_referer() -> String {
    DEFAULT_REFERER.to_string()
}
fn default_user_agents() -> Vec<String> {
    DEFAULT_USER_AGENTS.iter().map(|s| s.to_string()).collect()
}

/// Updater tunables. Source endpoints are compiled in and not configurable.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IngestConfig {
    /// Per-request ceiling; sources are slow.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,
    /// Pause between sources in "all" mode.
    #[serde(default = "default_politeness_delay_ms")]
    pub politeness_delay_ms: u64,
    /// Sent on HTML requests only. Empty disables it.
    #[serde(default = "default_referer")]
    pub referer: String,
    #[serde(default = "default_user_agents")]
    pub user_agents: Vec<String>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: default_fetch_timeout_secs(),
            politeness_delay_ms: default_politeness_delay_ms(),
            referer: default_referer(),
            user_agents: default_user_agents(),
        }
    }
}

impl IngestConfig {
    /// Load from an explicit path. Supports TOML or JSON formats.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("reading ingest config from {}", path.display()))?;
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let cfg = parse_config(&content, ext.as_str())
            .with_context(|| format!("parsing ingest config {}", path.display()))?;
        Ok(cfg.sanitized())
    }

    /// Resolve config using env var + fallbacks, then apply env overrides:
    /// 1) $EUROMILLIONS_CONFIG
    /// 2) config/ingest.toml
    /// 3) config/ingest.json
    /// 4) built-in defaults
    pub fn load_default() -> Result<Self> {
        let base = if let Ok(p) = std::env::var(ENV_CONFIG_PATH) {
            let pb = PathBuf::from(p);
            if !pb.exists() {
                return Err(anyhow!("{ENV_CONFIG_PATH} points to non-existent path"));
            }
            Self::load_from(&pb)?
        } else {
            let toml_p = PathBuf::from("config/ingest.toml");
            let json_p = PathBuf::from("config/ingest.json");
            if toml_p.exists() {
                Self::load_from(&toml_p)?
            } else if json_p.exists() {
                Self::load_from(&json_p)?
            } else {
                Self::default()
            }
        };
        base.with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(v) = env_u64(ENV_FETCH_TIMEOUT_SECS)? {
            self.fetch_timeout_secs = v;
        }
        if let Some(v) = env_u64(ENV_POLITENESS_DELAY_MS)? {
            self.politeness_delay_ms = v;
        }
        Ok(self.sanitized())
    }

    fn sanitized(mut self) -> Self {
        if self.fetch_timeout_secs == 0 {
            self.fetch_timeout_secs = DEFAULT_FETCH_TIMEOUT_SECS;
        }
        self.user_agents = self
            .user_agents
            .into_iter()
            .map(|ua| ua.trim().to_string())
            .filter(|ua| !ua.is_empty())
            .collect();
        self
    }

    pub fn politeness_delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.politeness_delay_ms)
    }
}

fn env_u64(name: &str) -> Result<Option<u64>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Some)
            .with_context(|| format!("{name} must be a non-negative integer, got {raw:?}")),
        Err(_) => Ok(None),
    }
}

fn parse_config(s: &str, hint_ext: &str) -> Result<IngestConfig> {
    if hint_ext == "json" {
        return serde_json::from_str(s).context("invalid JSON");
    }
    match toml::from_str(s) {
        Ok(cfg) => Ok(cfg),
        Err(toml_err) => serde_json::from_str(s)
            .map_err(|_| anyhow!(toml_err))
            .context("invalid TOML"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let cfg = parse_config("politeness_delay_ms = 250", "toml").unwrap();
        assert_eq!(cfg.politeness_delay_ms, 250);
        assert_eq!(cfg.fetch_timeout_secs, 120);
        assert_eq!(cfg.referer, DEFAULT_REFERER);
        assert_eq!(cfg.user_agents.len(), 5);
    }

    #[test]
    fn json_is_accepted_by_hint_and_by_fallback() {
        let json = r#"{"fetch_timeout_secs": 30, "user_agents": ["a", "  ", "b"]}"#;
        let by_hint = parse_config(json, "json").unwrap().sanitized();
        let by_fallback = parse_config(json, "").unwrap().sanitized();
        assert_eq!(by_hint, by_fallback);
        assert_eq!(by_hint.fetch_timeout_secs, 30);
        assert_eq!(by_hint.user_agents, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn zero_timeout_is_replaced() {
        let cfg = parse_config("fetch_timeout_secs = 0", "toml").unwrap().sanitized();
        assert_eq!(cfg.fetch_timeout_secs, DEFAULT_FETCH_TIMEOUT_SECS);
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse_config("fetch_timeout_secs = [", "toml").is_err());
    }
}
