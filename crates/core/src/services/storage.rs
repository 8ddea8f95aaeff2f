//! Media storage orchestration.
//!
//! Clients never talk to the backend directly: they ask for a signed upload
//! grant, then PUT the bytes to the returned URL. The signature is checked
//! again when the bytes arrive.

use std::sync::Arc;

use serde::Deserialize;
use validator::Validate;

use casaflow_common::storage::{
    SignedUpload, StorageBackend, UploadUrlSigner, UploadedFile, generate_storage_key,
};
use casaflow_common::{AppError, AppResult};
use casaflow_db::entities::agent;

/// Maximum accepted upload size (10 MiB).
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Input for requesting an upload grant.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RequestUploadInput {
    #[validate(length(min = 1, max = 256))]
    pub file_name: String,
}

/// Service for listing media uploads.
#[derive(Clone)]
pub struct StorageService {
    backend: Arc<dyn StorageBackend>,
    signer: UploadUrlSigner,
    upload_ttl_minutes: i64,
}

impl StorageService {
    /// Create a new storage service.
    #[must_use]
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        signer: UploadUrlSigner,
        upload_ttl_minutes: i64,
    ) -> Self {
        Self {
            backend,
            signer,
            upload_ttl_minutes,
        }
    }

    /// Issue a signed upload grant scoped to the agent's agency.
    pub fn request_upload(
        &self,
        agent: &agent::Model,
        input: &RequestUploadInput,
    ) -> AppResult<SignedUpload> {
        input.validate()?;
        let agency_id = agent
            .agency_id
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Agent has no agency".to_string()))?;

        let key = generate_storage_key(agency_id, &input.file_name);
        let public_url = self.backend.public_url(&key);
        self.signer.sign(&key, public_url, self.upload_ttl_minutes)
    }

    /// Accept the uploaded bytes after re-verifying the grant.
    pub async fn store(
        &self,
        key: &str,
        expires_at: i64,
        signature: &str,
        data: &[u8],
        content_type: &str,
    ) -> AppResult<UploadedFile> {
        self.signer.verify(key, expires_at, signature)?;

        if data.is_empty() {
            return Err(AppError::BadRequest("Empty upload".to_string()));
        }
        if data.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::BadRequest(format!(
                "Upload exceeds the {MAX_UPLOAD_BYTES} byte limit"
            )));
        }

        self.backend.upload(key, data, content_type).await
    }
}
