// src/config.rs
use serde::Deserialize;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use crate::errors::{Result, VizError};

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// How the orchestrator treats responses that settle out of issue order.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResponseOrdering {
    /// Whatever settles last overwrites the state, even an older request.
    #[default]
    LastSettled,
    /// Settlements older than the newest issued request are dropped.
    LatestIssued,
}

impl FromStr for ResponseOrdering {
    type Err = VizError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "last-settled" | "last_settled" => Ok(ResponseOrdering::LastSettled),
            "latest-issued" | "latest_issued" => Ok(ResponseOrdering::LatestIssued),
            other => Err(VizError::Config(format!(
                "Unknown response ordering '{}'. Expected 'last-settled' or 'latest-issued'.",
                other
            ))),
        }
    }
}

/// Application configuration. Built once and handed to whatever needs it;
/// nothing reads the environment after construction.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Base address of the rendering service (`/visualize`, `/video/{index}`).
    pub api_base: String,

    /// Base address of a relay. When set, submissions go to
    /// `{relay_base}/api/visualize` instead of straight to the service.
    pub relay_base: Option<String>,

    /// Address the relay server binds to.
    pub bind: String,

    /// Timeout for a single remote call, in seconds.
    pub timeout_secs: u64,

    pub response_ordering: ResponseOrdering,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            relay_base: None,
            bind: DEFAULT_BIND.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            response_ordering: ResponseOrdering::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] but reading through `lookup`, so callers
    /// (and tests) can supply their own variables.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = AppConfig::default();

        if let Some(api_base) = lookup("NUMVIZ_API_URL") {
            config.api_base = api_base;
        }
        config.relay_base = lookup("NUMVIZ_RELAY_URL").filter(|s| !s.trim().is_empty());
        if let Some(bind) = lookup("NUMVIZ_BIND") {
            config.bind = bind;
        }
        if let Some(timeout) = lookup("NUMVIZ_TIMEOUT_SECS") {
            config.timeout_secs = timeout.trim().parse().map_err(|_| {
                VizError::Config(format!("NUMVIZ_TIMEOUT_SECS must be a whole number, got '{}'", timeout))
            })?;
        }
        if let Some(ordering) = lookup("NUMVIZ_RESPONSE_ORDERING") {
            config.response_ordering = ordering.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: AppConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    fn validate(&self) -> Result<()> {
        if self.api_base.trim().is_empty() {
            return Err(VizError::Config("api_base must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(VizError::Config("timeout_secs must be greater than zero".to_string()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Where submissions are posted.
    pub fn visualize_url(&self) -> String {
        match &self.relay_base {
            Some(relay) => format!("{}/api/visualize", relay.trim_end_matches('/')),
            None => self.upstream_visualize_url(),
        }
    }

    /// The rendering service's own endpoint, which the relay forwards to.
    pub fn upstream_visualize_url(&self) -> String {
        format!("{}/visualize", self.api_base.trim_end_matches('/'))
    }

    /// Media for the result at `index` of the latest successful run.
    pub fn video_url(&self, index: usize) -> String {
        format!("{}/video/{}", self.api_base.trim_end_matches('/'), index)
    }
}
