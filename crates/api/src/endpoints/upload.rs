//! Media upload endpoints.
//!
//! Uploads are a two-step handshake: the client requests a signed grant,
//! then PUTs the bytes to the granted URL. The PUT is authenticated by the
//! signature alone, so it works from a browser without the bearer token.

use axum::{
    Json, Router,
    body::Bytes,
    extract::{Path, Query, State},
    http::HeaderMap,
    routing::{post, put},
};
use casaflow_common::AppResult;
use casaflow_common::storage::{SignedUpload, UploadedFile};
use casaflow_core::RequestUploadInput;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{extractors::AuthAgent, middleware::AppState, response::ApiResponse};

/// Upload grant response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadGrantResponse {
    pub key: String,
    pub upload_url: String,
    pub public_url: String,
    pub expires_at: i64,
}

impl From<SignedUpload> for UploadGrantResponse {
    fn from(g: SignedUpload) -> Self {
        Self {
            key: g.key,
            upload_url: g.upload_url,
            public_url: g.public_url,
            expires_at: g.expires_at,
        }
    }
}

/// Stored file response.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadedFileResponse {
    pub key: String,
    pub url: String,
    pub size: u64,
    pub content_type: String,
    pub md5: String,
}

impl From<UploadedFile> for UploadedFileResponse {
    fn from(f: UploadedFile) -> Self {
        Self {
            key: f.key,
            url: f.url,
            size: f.size,
            content_type: f.content_type,
            md5: f.md5,
        }
    }
}

/// Signature query parameters on the PUT.
#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub expires: i64,
    pub signature: String,
}

/// Issue a signed upload grant.
async fn request_upload(
    AuthAgent(agent): AuthAgent,
    State(state): State<AppState>,
    Json(input): Json<RequestUploadInput>,
) -> AppResult<ApiResponse<UploadGrantResponse>> {
    let grant = state.storage_service.request_upload(&agent, &input)?;

    Ok(ApiResponse::ok(grant.into()))
}

/// Accept the uploaded bytes.
async fn store(
    State(state): State<AppState>,
    Path(key): Path<String>,
    Query(query): Query<UploadQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<ApiResponse<UploadedFileResponse>> {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let file = state
        .storage_service
        .store(&key, query.expires, &query.signature, &body, content_type)
        .await?;
    info!(key = %file.key, size = file.size, "Stored uploaded file");

    Ok(ApiResponse::ok(file.into()))
}

/// Create the upload router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/request", post(request_upload))
        .route("/{*key}", put(store))
}
