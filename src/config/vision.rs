// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use reqwest::Url;
use std::fmt;
use std::time::Duration;

use super::ConfigError;

/// Environment variable holding the Computer Vision endpoint
pub const ENDPOINT_ENV: &str = "AZURE_VISION_ENDPOINT";

/// Environment variable holding the subscription key
pub const API_KEY_ENV: &str = "AZURE_VISION_API_KEY";

/// Default timeout of the analyze call
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Credentials and limits for the remote vision service
#[derive(Clone, PartialEq)]
pub struct VisionConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl VisionConfig {
    pub fn new(endpoint: &str, api_key: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            timeout,
        }
    }

    /// Build from optional sources (flags or environment).
    ///
    /// Absent and blank values are both treated as missing.
    pub fn from_parts(
        endpoint: Option<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ConfigError> {
        let endpoint = non_blank(endpoint).ok_or(ConfigError::Missing(ENDPOINT_ENV))?;
        let api_key = non_blank(api_key).ok_or(ConfigError::Missing(API_KEY_ENV))?;

        let config = Self::new(&endpoint, &api_key, timeout);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.api_key.trim().is_empty() {
            return Err(ConfigError::Missing(API_KEY_ENV));
        }

        let url = Url::parse(self.endpoint.trim()).map_err(|e| ConfigError::InvalidEndpoint {
            endpoint: self.endpoint.clone(),
            reason: e.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }

        if self.timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "timeout",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// Keeps the subscription key out of logs
impl fmt::Debug for VisionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("timeout", &self.timeout)
            .finish()
    }
}
