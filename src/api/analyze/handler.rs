// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analyze endpoint handlers

use axum::{extract::State, http::StatusCode, response::Html, Json};
use axum_extra::extract::Multipart;
use tracing::{debug, info};

use super::request::read_upload;
use super::response::{AnalyzeResponse, HealthResponse};
use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::api::page::{preview_data_url, render_index, render_result, ResultPage};

/// GET / - The upload form
pub async fn index_handler() -> Html<String> {
    Html(render_index())
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

/// POST /v1/analyze - Analyze an uploaded image
///
/// # Request
/// - multipart form with an `image` file field (jpg, jpeg or png)
///
/// # Response
/// - `summary`: caption, narrative, objects and tags
/// - `raw`: the unmodified Computer Vision response
/// - `image`: dimensions and detected format of the upload
///
/// # Errors
/// - 400 Bad Request: missing image, unsupported file type
/// - 413 Payload Too Large: upload above the configured limit
/// - 422 Unprocessable Entity: bytes are not a decodable image
/// - 502 Bad Gateway: Computer Vision returned an error (body passed through)
/// - 504 Gateway Timeout: Computer Vision did not answer in time
pub async fn analyze_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = read_upload(&mut multipart, state.max_upload_bytes).await?;
    debug!("Analyze request for '{}'", upload.file_name);

    let outcome = state
        .analyzer
        .analyze(&upload.file_name, upload.bytes)
        .await?;

    Ok(Json(AnalyzeResponse::new(&upload.file_name, outcome)))
}

/// POST /analyze - Form submission, answered with the rendered result page
pub async fn analyze_page_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> (StatusCode, Html<String>) {
    let upload = match read_upload(&mut multipart, state.max_upload_bytes).await {
        Ok(upload) => upload,
        Err(err) => return error_page("", &err),
    };

    let preview = preview_data_url(&upload.bytes);
    match state
        .analyzer
        .analyze(&upload.file_name, upload.bytes)
        .await
    {
        Ok(outcome) => {
            info!("Rendered analysis of '{}'", upload.file_name);
            let html = render_result(&ResultPage {
                file_name: &upload.file_name,
                preview,
                result: Ok(&outcome),
            });
            (StatusCode::OK, Html(html))
        }
        Err(err) => {
            let err = ApiError::from(err);
            let html = render_result(&ResultPage {
                file_name: &upload.file_name,
                preview,
                result: Err(&err),
            });
            (status_of(&err), Html(html))
        }
    }
}

fn error_page(file_name: &str, err: &ApiError) -> (StatusCode, Html<String>) {
    let html = render_result(&ResultPage {
        file_name,
        preview: None,
        result: Err(err),
    });
    (status_of(err), Html(html))
}

fn status_of(err: &ApiError) -> StatusCode {
    StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}
