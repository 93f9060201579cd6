// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Typed view of the Azure Computer Vision `analyze` response
//!
//! Only the fields the summarizer reads are modelled. Everything else in the
//! payload (bounding rectangles, metadata, request ids) is ignored.

use serde::{Deserialize, Serialize};

/// A ranked natural-language caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Caption {
    pub text: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

/// The `description` block of the response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Description {
    #[serde(default)]
    pub captions: Option<Vec<Caption>>,
}

/// A detected object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedObject {
    /// Object label/class
    #[serde(rename = "object")]
    pub label: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

/// A keyword tag
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageTag {
    pub name: String,
    /// Confidence score (0.0-1.0)
    pub confidence: f64,
}

/// Parsed analysis result
///
/// Each block is optional: a response without `objects` and a response with
/// `"objects": []` both mean nothing was detected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    #[serde(default)]
    pub description: Option<Description>,
    #[serde(default)]
    pub objects: Option<Vec<DetectedObject>>,
    #[serde(default)]
    pub tags: Option<Vec<ImageTag>>,
}

impl AnalysisResult {
    /// Captions in API ranking order, empty when absent
    pub fn captions(&self) -> &[Caption] {
        self.description
            .as_ref()
            .and_then(|d| d.captions.as_deref())
            .unwrap_or_default()
    }

    /// Detected objects in API order, empty when absent
    pub fn objects(&self) -> &[DetectedObject] {
        self.objects.as_deref().unwrap_or_default()
    }

    /// Tags in API order, empty when absent
    pub fn tags(&self) -> &[ImageTag] {
        self.tags.as_deref().unwrap_or_default()
    }
}
