// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Startup configuration
//!
//! Configuration is resolved once (flags, environment, `.env`) and handed to
//! the pipeline as plain values.

pub mod server;
pub mod vision;

pub use server::{ServerArgs, ServerConfig};
pub use vision::{VisionConfig, API_KEY_ENV, DEFAULT_TIMEOUT_SECS, ENDPOINT_ENV};

use std::env;
use std::path::Path;
use thiserror::Error;

/// Variable holding the tracing filter
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Load a `.env` file, then default `RUST_LOG` when neither the file nor the
/// process environment set it. Returns the effective filter.
///
/// Must run before the tracing subscriber is initialized. With no path,
/// `.env` is searched from the current directory upwards.
pub fn prepare_environment(env_file: Option<&Path>, default_filter: &str) -> String {
    match env_file {
        Some(path) => {
            dotenv::from_path(path).ok();
        }
        None => {
            dotenv::dotenv().ok();
        }
    }

    match env::var(LOG_FILTER_ENV) {
        Ok(filter) => filter,
        Err(_) => {
            env::set_var(LOG_FILTER_ENV, default_filter);
            default_filter.to_string()
        }
    }
}

/// Invalid or missing startup configuration. Fatal for the binaries.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing configuration: set {0}")]
    Missing(&'static str),

    #[error("Invalid vision endpoint '{endpoint}': {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    #[error("Invalid value for {name}: {message}")]
    InvalidValue { name: &'static str, message: String },
}

/// Serializes tests that mutate the process environment
#[cfg(test)]
pub(crate) static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
