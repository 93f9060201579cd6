// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze response types

use serde::Serialize;

use crate::pipeline::AnalysisOutcome;
use crate::vision::{ImageInfo, Summary};

/// Provider reported in every analyze response
pub const PROVIDER: &str = "azure-computer-vision";

/// Response from POST /v1/analyze
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    /// Uploaded file name
    pub file_name: String,
    pub summary: Summary,
    /// Raw service response, unmodified
    pub raw: serde_json::Value,
    pub image: ImageInfo,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
    pub provider: String,
}

impl AnalyzeResponse {
    pub fn new(file_name: &str, outcome: AnalysisOutcome) -> Self {
        Self {
            file_name: file_name.to_string(),
            summary: outcome.summary,
            raw: outcome.raw,
            image: outcome.image,
            processing_time_ms: outcome.processing_time_ms,
            provider: PROVIDER.to_string(),
        }
    }
}

/// Response from GET /health
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
