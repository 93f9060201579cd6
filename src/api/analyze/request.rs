// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Multipart upload extraction for the analyze endpoints

use axum::http::StatusCode;
use axum_extra::extract::Multipart;

use crate::api::errors::ApiError;

/// Name of the multipart field carrying the image
pub const IMAGE_FIELD: &str = "image";

/// A file received from the upload form
#[derive(Debug, Clone)]
pub struct Upload {
    /// Client-supplied file name (never trusted for decoding)
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Read the `image` field from a multipart body.
///
/// Other fields are skipped. A missing or empty image field is a validation
/// error; uploads above `max_bytes` are rejected.
pub async fn read_upload(multipart: &mut Multipart, max_bytes: usize) -> Result<Upload, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e.status(), e.body_text(), max_bytes))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| multipart_error(e.status(), e.body_text(), max_bytes))?;

        if bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge { limit: max_bytes });
        }
        if bytes.is_empty() {
            return Err(ApiError::ValidationError {
                field: IMAGE_FIELD.to_string(),
                message: "image is empty".to_string(),
            });
        }

        return Ok(Upload {
            file_name,
            bytes: bytes.to_vec(),
        });
    }

    Err(ApiError::ValidationError {
        field: IMAGE_FIELD.to_string(),
        message: "image is required".to_string(),
    })
}

fn multipart_error(status: StatusCode, text: String, max_bytes: usize) -> ApiError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge { limit: max_bytes }
    } else {
        ApiError::InvalidRequest(text)
    }
}
