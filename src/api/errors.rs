// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::pipeline::AnalyzeError;
use crate::vision::RemoteCallError;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error_type: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<HashMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    InvalidRequest(String),
    ValidationError {
        field: String,
        message: String,
    },
    UnsupportedFileType(String),
    PayloadTooLarge {
        limit: usize,
    },
    DecodeFailed(String),
    UpstreamError {
        status: Option<u16>,
        message: String,
    },
    Timeout(String),
    InternalError(String),
}

impl ApiError {
    pub fn to_response(&self) -> ErrorResponse {
        let (error_type, message, details) = match self {
            ApiError::InvalidRequest(msg) => ("invalid_request", msg.clone(), None),
            ApiError::ValidationError { field, message } => {
                let mut details = HashMap::new();
                details.insert(
                    "field".to_string(),
                    serde_json::Value::String(field.clone()),
                );
                ("validation_error", message.clone(), Some(details))
            }
            ApiError::UnsupportedFileType(msg) => ("unsupported_file_type", msg.clone(), None),
            ApiError::PayloadTooLarge { limit } => {
                let mut details = HashMap::new();
                details.insert(
                    "limit_bytes".to_string(),
                    serde_json::Value::Number((*limit as u64).into()),
                );
                (
                    "payload_too_large",
                    format!("Upload exceeds the limit of {} bytes", limit),
                    Some(details),
                )
            }
            ApiError::DecodeFailed(msg) => ("decode_error", msg.clone(), None),
            ApiError::UpstreamError { status, message } => {
                let details = status.map(|status| {
                    let mut details = HashMap::new();
                    details.insert(
                        "upstream_status".to_string(),
                        serde_json::Value::Number(status.into()),
                    );
                    details
                });
                ("remote_call_error", message.clone(), details)
            }
            ApiError::Timeout(msg) => ("timeout", msg.clone(), None),
            ApiError::InternalError(msg) => ("internal_error", msg.clone(), None),
        };

        ErrorResponse {
            error_type: error_type.to_string(),
            message,
            details,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::InvalidRequest(_)
            | ApiError::ValidationError { .. }
            | ApiError::UnsupportedFileType(_) => 400,
            ApiError::PayloadTooLarge { .. } => 413,
            ApiError::DecodeFailed(_) => 422,
            ApiError::UpstreamError { .. } => 502,
            ApiError::Timeout(_) => 504,
            ApiError::InternalError(_) => 500,
        }
    }

    /// Text shown to the user; remote error bodies are passed through verbatim
    pub fn message(&self) -> String {
        self.to_response().message
    }
}

impl From<AnalyzeError> for ApiError {
    fn from(err: AnalyzeError) -> Self {
        let message = err.to_string();
        match err {
            AnalyzeError::UnsupportedExtension(_) => ApiError::UnsupportedFileType(message),
            AnalyzeError::Decode(_) => ApiError::DecodeFailed(message),
            AnalyzeError::Remote(RemoteCallError::Timeout(_)) => ApiError::Timeout(message),
            AnalyzeError::Remote(RemoteCallError::Status { status, body }) => {
                ApiError::UpstreamError {
                    status: Some(status),
                    message: body,
                }
            }
            AnalyzeError::Remote(_) => ApiError::UpstreamError {
                status: None,
                message,
            },
            AnalyzeError::Worker(msg) => ApiError::InternalError(msg),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::InvalidRequest(msg) => write!(f, "Invalid request: {}", msg),
            ApiError::ValidationError { field, message } => {
                write!(f, "Validation error for {}: {}", field, message)
            }
            ApiError::UnsupportedFileType(msg) => write!(f, "{}", msg),
            ApiError::PayloadTooLarge { limit } => {
                write!(f, "Upload exceeds the limit of {} bytes", limit)
            }
            ApiError::DecodeFailed(msg) => write!(f, "Invalid image: {}", msg),
            ApiError::UpstreamError { message, .. } => write!(f, "{}", message),
            ApiError::Timeout(msg) => write!(f, "{}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_response())).into_response()
    }
}
