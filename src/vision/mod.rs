// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing module
//!
//! This module provides:
//! - Upload normalization (decode, flatten to RGB, re-encode as JPEG)
//! - The Azure Computer Vision analyze client
//! - Summaries derived from the analyze response
//!
//! No image analysis happens locally.

pub mod analysis;
pub mod image_utils;
pub mod summary;
pub mod vision_client;

pub use analysis::{AnalysisResult, Caption, Description, DetectedObject, ImageTag};
pub use image_utils::{
    decode_image_bytes, detect_format, format_to_extension, normalize, ImageError, ImageInfo,
    NormalizedImage,
};
pub use summary::{
    summarize, CaptionView, DescriptionView, Listing, ObjectCard, Summary, TagChip,
};
pub use vision_client::{AnalysisResponse, RemoteCallError, VisionClient, VisionService};
