use reqwest::Url;
use std::{env, time::Duration};

use crate::errors::AppError;

pub const DEFAULT_API_URL: &str = "http://localhost:3001";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the remote rental API.
    pub api_url: String,
    pub host: String,
    pub port: u16,
    /// Per-request timeout for remote calls; `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let api_url = lookup("CONSOLE_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        Url::parse(&api_url)
            .map_err(|e| AppError::Config(format!("CONSOLE_API_URL {api_url:?}: {e}")))?;

        let host = lookup("CONSOLE_HOST").unwrap_or_else(|| "0.0.0.0".to_owned());

        let port = match lookup("CONSOLE_PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| AppError::Config(format!("CONSOLE_PORT {raw:?}: {e}")))?,
            None => 8080,
        };

        let request_timeout = match lookup("CONSOLE_REQUEST_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.parse::<u64>().map_err(|e| {
                    AppError::Config(format!("CONSOLE_REQUEST_TIMEOUT_SECS {raw:?}: {e}"))
                })?;
                Some(Duration::from_secs(secs))
            }
            None => None,
        };

        Ok(Self {
            api_url,
            host,
            port,
            request_timeout,
        })
    }

    /// Shared HTTP client for every resource.
    pub fn http_client(&self) -> Result<reqwest::Client, AppError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
