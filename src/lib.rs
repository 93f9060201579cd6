// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod cli;
pub mod config;
pub mod pipeline;
pub mod vision;

// Re-export main types
pub use config::{ConfigError, ServerConfig, VisionConfig};
pub use pipeline::{check_extension, AnalysisOutcome, AnalyzeError, Analyzer};
pub use vision::{
    normalize, summarize, AnalysisResult, NormalizedImage, RemoteCallError, Summary, VisionClient,
    VisionService,
};
