// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /v1/analyze tests
//!
//! The router runs against a stub vision service, so these tests cover the
//! upload boundary, the pipeline ordering and the JSON error mapping without
//! any network access.

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use image::{DynamicImage, ImageFormat, RgbaImage};
use image_analyzer::{
    api::{create_router, AppState},
    pipeline::Analyzer,
    vision::{AnalysisResponse, NormalizedImage, RemoteCallError, VisionService},
};
use serde_json::{json, Value};
use std::io::Cursor;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tower::util::ServiceExt;

const BOUNDARY: &str = "XBOUNDARYX";

/// Vision service answering with a fixed result and counting calls
struct StubVision {
    reply: Result<Value, (u16, String)>,
    calls: AtomicUsize,
}

#[async_trait]
impl VisionService for StubVision {
    async fn analyze(&self, image: NormalizedImage) -> Result<AnalysisResponse, RemoteCallError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert!(image.as_bytes().starts_with(&[0xFF, 0xD8, 0xFF]));
        match &self.reply {
            Ok(raw) => Ok(AnalysisResponse {
                result: serde_json::from_value(raw.clone()).unwrap(),
                raw: raw.clone(),
                processing_time_ms: 3,
            }),
            Err((status, body)) => Err(RemoteCallError::Status {
                status: *status,
                body: body.clone(),
            }),
        }
    }
}

fn stub(reply: Result<Value, (u16, String)>) -> Arc<StubVision> {
    Arc::new(StubVision {
        reply,
        calls: AtomicUsize::new(0),
    })
}

fn app(vision: Arc<StubVision>, max_upload_bytes: usize) -> Router {
    let analyzer = Analyzer::with_service(vision);
    create_router(AppState::new(analyzer, max_upload_bytes))
}

fn png_bytes(width: u32, height: u32) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(RgbaImage::new(width, height))
        .write_to(&mut buffer, ImageFormat::Png)
        .unwrap();
    buffer.into_inner()
}

fn multipart_body(field: &str, file_name: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn cat_result() -> Value {
    json!({
        "description": {"captions": [{"text": "a cat sitting on a chair", "confidence": 0.873}]},
        "objects": [
            {"object": "cat", "confidence": 0.95},
            {"object": "chair", "confidence": 0.81}
        ],
        "tags": [
            {"name": "animal", "confidence": 0.99},
            {"name": "indoor", "confidence": 0.6}
        ],
        "requestId": "abc",
        "metadata": {"width": 8, "height": 6, "format": "Jpeg"}
    })
}

#[cfg(test)]
mod analyze_endpoint_tests {
    use super::*;

    #[tokio::test]
    async fn test_analyze_png_returns_summary() {
        let vision = stub(Ok(cat_result()));
        let request = upload_request("/v1/analyze", multipart_body("image", "cat.png", &png_bytes(8, 6)));

        let response = app(vision.clone(), 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 1);

        let body = json_body(response).await;
        assert_eq!(body["fileName"], "cat.png");
        assert_eq!(body["provider"], "azure-computer-vision");
        assert_eq!(body["image"]["width"], 8);
        assert_eq!(body["image"]["height"], 6);
        assert_eq!(body["image"]["format"], "png");

        let description = &body["summary"]["description"];
        assert_eq!(description["status"], "described");
        assert_eq!(description["caption"]["text"], "a cat sitting on a chair");
        assert_eq!(description["caption"]["confidence"], "87.3%");
        assert_eq!(
            description["narrative"],
            "The AI thinks this image is about a cat sitting on a chair. It seems to show cat, chair. The scene relates to animal, indoor."
        );

        let objects = &body["summary"]["objects"]["items"];
        assert_eq!(objects[0]["label"], "Cat");
        assert_eq!(objects[0]["confidence"], "95.0%");
        assert_eq!(body["summary"]["tags"]["items"][1]["confidence"], "60%");

        // Raw response is passed through untouched, unknown fields included
        assert_eq!(body["raw"]["requestId"], "abc");
        assert_eq!(body["raw"]["metadata"]["format"], "Jpeg");
    }

    #[tokio::test]
    async fn test_analyze_empty_result_has_empty_states() {
        let vision = stub(Ok(json!({"requestId": "empty"})));
        let request = upload_request("/v1/analyze", multipart_body("image", "blank.jpg", &png_bytes(2, 2)));

        let response = app(vision, 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["summary"]["description"]["status"], "no_description");
        assert_eq!(body["summary"]["objects"]["status"], "none_detected");
        assert_eq!(body["summary"]["tags"]["status"], "none_detected");
    }

    #[tokio::test]
    async fn test_unsupported_extension_is_rejected_before_remote_call() {
        let vision = stub(Ok(cat_result()));
        let request = upload_request("/v1/analyze", multipart_body("image", "anim.gif", &png_bytes(2, 2)));

        let response = app(vision.clone(), 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "unsupported_file_type");
    }

    #[tokio::test]
    async fn test_non_image_bytes_are_decode_errors() {
        let vision = stub(Ok(cat_result()));
        let request = upload_request(
            "/v1/analyze",
            multipart_body("image", "notes.png", b"definitely not a picture"),
        );

        let response = app(vision.clone(), 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "decode_error");
    }

    #[tokio::test]
    async fn test_missing_image_field() {
        let vision = stub(Ok(cat_result()));
        let request = upload_request("/v1/analyze", multipart_body("picture", "cat.png", &png_bytes(2, 2)));

        let response = app(vision, 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "validation_error");
        assert_eq!(body["details"]["field"], "image");
    }

    #[tokio::test]
    async fn test_upload_over_limit_is_413() {
        let vision = stub(Ok(cat_result()));
        let image = png_bytes(64, 64);
        let limit = image.len() - 1;
        let request = upload_request("/v1/analyze", multipart_body("image", "big.png", &image));

        let response = app(vision.clone(), limit).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(vision.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_remote_error_body_is_passed_through() {
        let remote_body = r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#;
        let vision = stub(Err((401, remote_body.to_string())));
        let request = upload_request("/v1/analyze", multipart_body("image", "cat.jpeg", &png_bytes(4, 4)));

        let response = app(vision, 1024 * 1024).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let body = json_body(response).await;
        assert_eq!(body["error_type"], "remote_call_error");
        assert_eq!(body["message"], remote_body);
        assert_eq!(body["details"]["upstream_status"], 401);
    }
}
