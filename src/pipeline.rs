// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! The analysis pipeline: extension check, normalize, remote call, summarize
//!
//! Stages run strictly in order. The first failing stage aborts the rest, so
//! a caller never sees a partial summary.

use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::VisionConfig;
use crate::vision::{
    format_to_extension, normalize, summarize, AnalysisResponse, ImageError, ImageInfo,
    NormalizedImage, RemoteCallError, Summary, VisionClient, VisionService,
};

/// File extensions accepted at the upload boundary
pub const SUPPORTED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Why an analysis was aborted
#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("Unsupported file type '{0}', supported: jpg, jpeg, png")]
    UnsupportedExtension(String),

    #[error(transparent)]
    Decode(#[from] ImageError),

    #[error(transparent)]
    Remote(#[from] RemoteCallError),

    #[error("Image processing task failed: {0}")]
    Worker(String),
}

/// Everything produced by one successful analysis
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    pub summary: Summary,
    /// The raw service response
    pub raw: serde_json::Value,
    /// The upload as decoded by the normalizer
    pub image: ImageInfo,
    pub processing_time_ms: u64,
}

/// Reject file names outside the accepted extensions
pub fn check_extension(file_name: &str) -> Result<(), AnalyzeError> {
    let extension = Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    if SUPPORTED_EXTENSIONS.contains(&extension.as_str()) {
        Ok(())
    } else {
        Err(AnalyzeError::UnsupportedExtension(extension))
    }
}

/// Run the normalizer on a blocking worker thread
pub async fn normalize_upload(bytes: Vec<u8>) -> Result<NormalizedImage, AnalyzeError> {
    tokio::task::spawn_blocking(move || normalize(&bytes))
        .await
        .map_err(|e| AnalyzeError::Worker(e.to_string()))?
        .map_err(AnalyzeError::from)
}

/// Runs analyses against a vision service
pub struct Analyzer {
    vision: Arc<dyn VisionService>,
}

impl Analyzer {
    /// Create an analyzer talking to the configured Computer Vision endpoint
    pub fn new(config: &VisionConfig) -> anyhow::Result<Self> {
        let client = VisionClient::new(config)?;
        Ok(Self::with_service(Arc::new(client)))
    }

    /// Create an analyzer on top of any vision service
    pub fn with_service(vision: Arc<dyn VisionService>) -> Self {
        Self { vision }
    }

    /// Analyze one upload end to end
    pub async fn analyze(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<AnalysisOutcome, AnalyzeError> {
        let request_id = Uuid::new_v4();
        let start = Instant::now();
        debug!(%request_id, "Analysis requested for '{}' ({} bytes)", file_name, bytes.len());

        let result = self.run(file_name, bytes).await;
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok((response, image)) => {
                let summary = summarize(&response.result);
                info!(
                    %request_id,
                    "Analysis complete: {}x{} {}, {} objects, {} tags, {}ms",
                    image.width,
                    image.height,
                    format_to_extension(image.format),
                    summary.objects.items().len(),
                    summary.tags.items().len(),
                    elapsed_ms
                );
                Ok(AnalysisOutcome {
                    summary,
                    raw: response.raw,
                    image,
                    processing_time_ms: elapsed_ms,
                })
            }
            Err(e) => {
                warn!(%request_id, "Analysis of '{}' failed: {}", file_name, e);
                Err(e)
            }
        }
    }

    async fn run(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<(AnalysisResponse, ImageInfo), AnalyzeError> {
        check_extension(file_name)?;

        let normalized = normalize_upload(bytes).await?;
        let image = normalized.info().clone();
        debug!(
            "Normalized {}x{} image to {} JPEG bytes",
            image.width,
            image.height,
            normalized.as_bytes().len()
        );

        let response = self.vision.analyze(normalized).await?;
        Ok((response, image))
    }
}
