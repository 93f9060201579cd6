// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Client for the Azure Computer Vision `analyze` API

use async_trait::async_trait;
use reqwest::{header, Client, StatusCode};
use std::fmt;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info};

use super::analysis::AnalysisResult;
use super::image_utils::NormalizedImage;
use crate::config::VisionConfig;

/// API path, relative to the configured endpoint
pub const ANALYZE_PATH: &str = "/vision/v3.2/analyze";

/// Features requested from the analyze call
pub const VISUAL_FEATURES: &str = "Description,Objects,Tags";

/// Header carrying the subscription key
pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Failures of the remote analyze call
#[derive(Debug, Error)]
pub enum RemoteCallError {
    /// Non-200 answer; the body is surfaced verbatim
    #[error("{body}")]
    Status { status: u16, body: String },

    #[error("Vision request timed out after {0} seconds")]
    Timeout(u64),

    #[error("Vision request failed: {0}")]
    Network(String),

    #[error("Invalid response from vision service: {0}")]
    InvalidResponse(String),
}

/// Successful analyze call
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    /// Typed view of the fields the summarizer reads
    pub result: AnalysisResult,
    /// The full response body as returned by the service
    pub raw: serde_json::Value,
    pub processing_time_ms: u64,
}

/// Something that can analyze a normalized image
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait VisionService: Send + Sync {
    async fn analyze(&self, image: NormalizedImage) -> Result<AnalysisResponse, RemoteCallError>;
}

/// HTTP client for the analyze endpoint
pub struct VisionClient {
    client: Client,
    endpoint: String,
    api_key: String,
    timeout: Duration,
}

impl VisionClient {
    /// Create a new vision client
    pub fn new(config: &VisionConfig) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        info!(
            "Vision client configured: endpoint={}, timeout={}s",
            endpoint,
            config.timeout.as_secs()
        );

        Ok(Self {
            client,
            endpoint,
            api_key: config.api_key.clone(),
            timeout: config.timeout,
        })
    }

    /// Endpoint without trailing slash
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Full URL of the analyze call, without query string
    pub fn analyze_url(&self) -> String {
        format!("{}{}", self.endpoint, ANALYZE_PATH)
    }

    fn transport_error(&self, e: reqwest::Error) -> RemoteCallError {
        if e.is_timeout() {
            RemoteCallError::Timeout(self.timeout.as_secs())
        } else {
            RemoteCallError::Network(e.to_string())
        }
    }
}

#[async_trait]
impl VisionService for VisionClient {
    async fn analyze(&self, image: NormalizedImage) -> Result<AnalysisResponse, RemoteCallError> {
        let start = Instant::now();
        let body = image.into_bytes();
        debug!("Sending {} bytes to {}", body.len(), self.analyze_url());

        let response = self
            .client
            .post(self.analyze_url())
            .query(&[("visualFeatures", VISUAL_FEATURES)])
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .header(SUBSCRIPTION_KEY_HEADER, &self.api_key)
            .body(body)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| self.transport_error(e))?;

        if status != StatusCode::OK {
            return Err(RemoteCallError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let raw: serde_json::Value = serde_json::from_str(&text)
            .map_err(|e| RemoteCallError::InvalidResponse(e.to_string()))?;
        let result: AnalysisResult = serde_json::from_value(raw.clone())
            .map_err(|e| RemoteCallError::InvalidResponse(e.to_string()))?;

        let processing_time_ms = start.elapsed().as_millis() as u64;
        debug!("Vision analyze answered in {}ms", processing_time_ms);

        Ok(AnalysisResponse {
            result,
            raw,
            processing_time_ms,
        })
    }
}

impl fmt::Debug for VisionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisionClient")
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}
