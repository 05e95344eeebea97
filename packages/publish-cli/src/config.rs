use std::env;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use dotenvy::dotenv;

const DEFAULT_STRAPI_URL: &str = "http://localhost:1337";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// CLI configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub strapi_url: String,
    pub api_token: Option<String>,
    pub timeout: Duration,
    pub upload_concurrency: usize,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let timeout_secs = match lookup("STRAPI_TIMEOUT_SECS") {
            Some(value) => value
                .parse()
                .context("STRAPI_TIMEOUT_SECS must be a valid number")?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        let upload_concurrency: usize = match lookup("PUBLISH_UPLOAD_CONCURRENCY") {
            Some(value) => value
                .parse()
                .context("PUBLISH_UPLOAD_CONCURRENCY must be a valid number")?,
            None => 1,
        };

        Ok(Self {
            strapi_url: lookup("STRAPI_URL").unwrap_or_else(|| DEFAULT_STRAPI_URL.to_string()),
            api_token: lookup("STRAPI_API_TOKEN").filter(|token| !token.is_empty()),
            timeout: Duration::from_secs(timeout_secs),
            upload_concurrency: upload_concurrency.max(1),
        })
    }

    /// API token, required for anything that talks to Strapi
    pub fn require_token(&self) -> Result<&str> {
        self.api_token
            .as_deref()
            .ok_or_else(|| anyhow!("STRAPI_API_TOKEN environment variable is required"))
    }
}
