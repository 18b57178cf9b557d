use std::time::Duration;

use anyhow::{bail, Context, Result};
use log::debug;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:5000";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

const BASE_URL_VAR: &str = "SURVEY_API_BASE_URL";
const TOKEN_VAR: &str = "SURVEY_API_TOKEN";
const TIMEOUT_VAR: &str = "SURVEY_API_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Duration,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_owned(),
            api_token: None,
            request_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl AppConfig {
    /// Reads `.env` (if any) and then the process environment.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => return Err(e).context("failed to read .env"),
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(url) = lookup(BASE_URL_VAR).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = normalize_base_url(&url);
        }
        config.api_token = lookup(TOKEN_VAR)
            .map(|t| t.trim().to_owned())
            .filter(|t| !t.is_empty());
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw
                .trim()
                .parse()
                .with_context(|| format!("{TIMEOUT_VAR} must be a whole number of seconds, got `{raw}`"))?;
            if secs == 0 {
                bail!("{TIMEOUT_VAR} must be at least one second");
            }
            config.request_timeout = Duration::from_secs(secs);
        }
        Ok(config)
    }
}

pub fn normalize_base_url(url: &str) -> String {
    url.trim().trim_end_matches('/').to_owned()
}
