// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Page routes: GET /, POST /analyze and GET /health

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, RgbImage};
use image_analyzer::{
    api::{create_router, page::escape, AppState},
    pipeline::Analyzer,
    vision::{AnalysisResponse, NormalizedImage, RemoteCallError, VisionService},
};
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;
use tower::util::ServiceExt;

const BOUNDARY: &str = "PAGEBOUNDARY";

struct FixedVision;

#[async_trait]
impl VisionService for FixedVision {
    async fn analyze(&self, _image: NormalizedImage) -> Result<AnalysisResponse, RemoteCallError> {
        let raw = json!({
            "description": {"captions": [{"text": "a red square", "confidence": 0.5}]},
            "objects": [],
            "tags": [{"name": "red", "confidence": 0.97}]
        });
        Ok(AnalysisResponse {
            result: serde_json::from_value(raw.clone()).unwrap(),
            raw,
            processing_time_ms: 1,
        })
    }
}

struct FailingVision;

#[async_trait]
impl VisionService for FailingVision {
    async fn analyze(&self, _image: NormalizedImage) -> Result<AnalysisResponse, RemoteCallError> {
        Err(RemoteCallError::Timeout(30))
    }
}

fn app(vision: Arc<dyn VisionService>) -> Router {
    create_router(AppState::new(Analyzer::with_service(vision), 1024 * 1024))
}

fn jpeg_bytes() -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 3, image::Rgb([255, 0, 0])))
        .write_to(&mut buffer, ImageFormat::Jpeg)
        .unwrap();
    buffer.into_inner()
}

fn form_upload(file_name: &str, bytes: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"image\"; filename=\"{}\"\r\n",
            file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/jpeg\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/analyze")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn text_body(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[cfg(test)]
mod page_route_tests {
    use super::*;

    #[tokio::test]
    async fn test_index_serves_upload_form() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app(Arc::new(FixedVision)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains(r#"action="/analyze""#));
        assert!(html.contains(r#"accept=".jpg,.jpeg,.png""#));
        assert!(!html.contains("Image Description"));
    }

    #[tokio::test]
    async fn test_health() {
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let response = app(Arc::new(FixedVision)).oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body: serde_json::Value =
            serde_json::from_str(&text_body(response).await).unwrap();
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_form_submission_renders_result_page() {
        let response = app(Arc::new(FixedVision))
            .oneshot(form_upload("red.jpg", &jpeg_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let html = text_body(response).await;
        assert!(html.contains("data:image/jpeg;base64,"));
        assert!(html.contains(&escape("a red square")));
        assert!(html.contains(&escape("50.0%")));
        assert!(html.contains(&escape("No objects detected")));
        assert!(html.contains(&escape("97%")));
        assert!(html.contains("Raw API Response"));
    }

    #[tokio::test]
    async fn test_form_submission_shows_error_banner() {
        let response = app(Arc::new(FailingVision))
            .oneshot(form_upload("red.jpg", &jpeg_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
        let html = text_body(response).await;
        assert!(html.contains(r#"class="error""#));
        assert!(html.contains(&escape("Vision request timed out after 30 seconds")));
        assert!(!html.contains("Detected Objects"));
    }

    #[tokio::test]
    async fn test_form_submission_unsupported_type() {
        let response = app(Arc::new(FixedVision))
            .oneshot(form_upload("scan.tiff", &jpeg_bytes()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = text_body(response).await;
        assert!(html.contains(r#"class="error""#));
    }
}
