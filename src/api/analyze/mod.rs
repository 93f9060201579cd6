// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze API endpoint module
//!
//! Provides the upload form, POST /analyze (HTML) and POST /v1/analyze (JSON).

pub mod handler;
pub mod request;
pub mod response;

pub use handler::{analyze_handler, analyze_page_handler, health_handler, index_handler};
pub use request::{read_upload, Upload, IMAGE_FIELD};
pub use response::{AnalyzeResponse, HealthResponse};
