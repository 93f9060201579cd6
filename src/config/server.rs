// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

use super::vision::{VisionConfig, DEFAULT_TIMEOUT_SECS};
use super::ConfigError;

/// Default address of the web form
pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8501";

/// Default cap on upload size (200 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// HTTP server settings
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub listen_addr: SocketAddr,
    pub max_upload_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([127, 0, 0, 1], 8501)),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        }
    }
}

/// Image Analyzer web server
#[derive(Parser)]
#[command(name = "image-analyzer")]
#[command(version)]
#[command(about = "Analyze images using Azure Computer Vision", long_about = None)]
pub struct ServerArgs {
    /// Computer Vision endpoint URL
    #[arg(long, env = "AZURE_VISION_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Computer Vision subscription key
    #[arg(long, env = "AZURE_VISION_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Address the web form listens on
    #[arg(long, env = "LISTEN_ADDR", default_value = "127.0.0.1:8501")]
    pub listen_addr: String,

    /// Timeout of the analyze call, in seconds
    #[arg(long, env = "VISION_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Largest accepted upload, in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = DEFAULT_MAX_UPLOAD_BYTES)]
    pub max_upload_bytes: usize,
}

impl ServerArgs {
    /// Validate the arguments into the vision and server configurations
    pub fn resolve(self) -> Result<(VisionConfig, ServerConfig), ConfigError> {
        let vision = VisionConfig::from_parts(
            self.endpoint,
            self.api_key,
            Duration::from_secs(self.timeout_secs),
        )?;

        let listen_addr = self
            .listen_addr
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue {
                name: "LISTEN_ADDR",
                message: format!("'{}': {}", self.listen_addr, e),
            })?;

        if self.max_upload_bytes == 0 {
            return Err(ConfigError::InvalidValue {
                name: "MAX_UPLOAD_BYTES",
                message: "must be greater than zero".to_string(),
            });
        }

        Ok((
            vision,
            ServerConfig {
                listen_addr,
                max_upload_bytes: self.max_upload_bytes,
            },
        ))
    }
}
