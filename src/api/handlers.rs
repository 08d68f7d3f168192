//! HTTP request handlers
//!
//! Implements the analysis endpoint and the health check.
//!
//! Per-request lifecycle for `/analyze/`: receive multipart upload, write the
//! bytes to a uniquely named temp file, run the extractor on a blocking
//! worker, respond, and let the temp-file guard delete the file. The guard's
//! Drop runs on every exit path, including errors, worker panics, and handler
//! cancellation, so cleanup is guaranteed rather than best-effort.

use crate::analysis::{self, AnalysisResult};
use axum::{
    body::Bytes,
    extract::Multipart,
    http::StatusCode,
    Json,
};
use serde::Serialize;
use tracing::{error, info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    status: String,
    module: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    error: String,
}

/// Error half of every handler result: a status code plus a JSON body.
type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(message: &str) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}

/// The single server-error shape the API exposes. Decode failures, DSP
/// failures, and internal errors are deliberately indistinguishable to the
/// caller; details go to the log only.
fn analysis_failed() -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Analysis failed".to_string(),
        }),
    )
}

// ============================================================================
// Health Endpoint
// ============================================================================

/// GET /health - Health check endpoint
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        module: "sonascore".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

// ============================================================================
// Analysis Endpoint
// ============================================================================

/// POST /analyze/ - Analyze an uploaded audio file
///
/// Expects a multipart form with a `file` field. Responds 200 with the six
/// scores, 400 when no file (or an empty filename) was supplied, or 500 with
/// the generic "Analysis failed" message on any extraction error.
pub async fn analyze(mut multipart: Multipart) -> Result<Json<AnalysisResult>, ApiError> {
    // Locate the `file` field; nothing is written to disk before this check
    let mut upload: Option<(String, Bytes)> = None;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!("Malformed multipart body: {}", e);
                return Err(bad_request("Malformed multipart body"));
            }
        };

        if field.name() != Some("file") {
            continue;
        }

        let filename = field.file_name().unwrap_or("").to_string();
        if filename.is_empty() {
            return Err(bad_request("No file part in the request"));
        }

        // Read the full upload body into memory
        let data = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload body: {}", e);
            bad_request("Failed to read upload body")
        })?;
        upload = Some((filename, data));
        break;
    }

    let (filename, data) = upload.ok_or_else(|| bad_request("No file part in the request"))?;

    info!("Received upload '{}' ({} bytes)", filename, data.len());

    // Uniquely named temp file with a fixed .wav suffix; the decoder sniffs
    // the real format from content, not the extension. The guard deletes the
    // file when dropped, on every exit path below.
    let temp_file = tempfile::Builder::new()
        .prefix("sonascore-")
        .suffix(".wav")
        .tempfile()
        .map_err(|e| {
            error!("Failed to create temp file: {}", e);
            analysis_failed()
        })?;

    tokio::fs::write(temp_file.path(), &data).await.map_err(|e| {
        error!("Failed to write upload to temp file: {}", e);
        analysis_failed()
    })?;

    // The extractor is CPU-bound; run it off the request-accepting path
    let path = temp_file.path().to_path_buf();
    let outcome = tokio::task::spawn_blocking(move || analysis::analyze_file(&path)).await;

    let result = match outcome {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            error!("Analysis of '{}' failed: {}", filename, e);
            return Err(analysis_failed());
        }
        Err(e) => {
            error!("Analysis worker panicked for '{}': {}", filename, e);
            return Err(analysis_failed());
        }
    };

    Ok(Json(result))
    // temp_file drops here; the upload never outlives the request
}
