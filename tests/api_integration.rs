//! Integration tests for the sonascore HTTP API
//!
//! Exercises the router in-process with tower's `oneshot`:
//! - Health check
//! - Multipart upload happy path (200 with six bounded scores)
//! - Missing file field / empty filename (400)
//! - Corrupt upload (500 "Analysis failed")
//! - Temp-file cleanup on success and failure paths

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use sonascore::api::create_router;
use sonascore::config::Config;

const BOUNDARY: &str = "sonascore-test-boundary";

fn test_router() -> axum::Router {
    create_router(&Config::default())
}

/// Build a multipart/form-data body with a single part.
fn multipart_body(field: &str, filename: Option<&str>, data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    let disposition = match filename {
        Some(name) => format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, name
        ),
        None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", field),
    };
    body.extend_from_slice(disposition.as_bytes());
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// POST a multipart body to /analyze/ and return (status, parsed JSON).
async fn post_analyze(app: &axum::Router, body: Vec<u8>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze/")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).expect("JSON response body");
    (status, json)
}

/// Synthesize a WAV file in memory (via a temp file, since hound writes to paths).
fn sine_wav_bytes(freq: f32, sample_rate: u32, seconds: f32) -> Vec<u8> {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fixture.wav");
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut writer = hound::WavWriter::create(&path, spec).unwrap();
    for i in 0..(sample_rate as f32 * seconds) as usize {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * std::f32::consts::PI * freq * t).sin() * 0.5;
        writer.write_sample((sample * i16::MAX as f32) as i16).unwrap();
    }
    writer.finalize().unwrap();
    std::fs::read(&path).unwrap()
}

/// Count leftover sonascore upload temp files.
fn upload_temp_count() -> usize {
    std::fs::read_dir(std::env::temp_dir())
        .unwrap()
        .filter_map(|entry| entry.ok())
        .filter(|entry| {
            entry
                .file_name()
                .to_string_lossy()
                .starts_with("sonascore-")
        })
        .count()
}

#[tokio::test]
async fn test_health() {
    let app = test_router();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["module"], "sonascore");
}

#[tokio::test]
async fn test_analyze_success_idempotent_and_cleanup() {
    let app = test_router();
    let wav = sine_wav_bytes(440.0, 44100, 5.0);
    let baseline = upload_temp_count();

    // Happy path
    let (status, first) = post_analyze(&app, multipart_body("file", Some("tone.wav"), &wav)).await;
    assert_eq!(status, StatusCode::OK);

    let obj = first.as_object().expect("JSON object");
    assert_eq!(obj.len(), 6);
    assert!(first["tempo_bpm"].as_f64().unwrap() >= 0.0);
    for key in [
        "rhythmic_strength",
        "timbre_brightness",
        "energy_level",
        "harmonic_vs_percussive",
        "timbre_richness",
    ] {
        let value = first[key].as_f64().unwrap_or_else(|| panic!("missing {}", key));
        assert!((0.0..=100.0).contains(&value), "{} out of range: {}", key, value);
    }

    // Idempotence: same bytes yield identical scores
    let (status, second) = post_analyze(&app, multipart_body("file", Some("tone.wav"), &wav)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first, second);

    // Failure path: corrupt payload collapses to the generic 500
    let garbage: Vec<u8> = (0..4096u32).map(|i| (i * 31 % 253) as u8).collect();
    let (status, body) =
        post_analyze(&app, multipart_body("file", Some("broken.wav"), &garbage)).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Analysis failed");

    // Every request above has completed, so every upload temp file is gone
    assert_eq!(
        upload_temp_count(),
        baseline,
        "upload temp files leaked past their requests"
    );
}

#[tokio::test]
async fn test_analyze_without_file_field_is_400() {
    let app = test_router();
    let (status, body) =
        post_analyze(&app, multipart_body("metadata", None, b"not-a-file")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_analyze_with_empty_filename_is_400() {
    let app = test_router();
    let (status, body) = post_analyze(&app, multipart_body("file", Some(""), b"ignored")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "No file part in the request");
}

#[tokio::test]
async fn test_analyze_rejects_non_multipart() {
    let app = test_router();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/analyze/")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert!(
        response.status().is_client_error(),
        "expected a 4xx for non-multipart content, got {}",
        response.status()
    );
}

#[tokio::test]
async fn test_get_on_analyze_is_method_not_allowed() {
    let app = test_router();
    let request = Request::builder()
        .method(Method::GET)
        .uri("/analyze/")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    // GET on a POST-only route
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
